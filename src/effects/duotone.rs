use crate::{
    buffer::ImageBuffer,
    foundation::{
        error::{DuotoneError, DuotoneResult},
        math::clamp_channel,
    },
};

/// BT.709 luma weights.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

const CONTRAST_EXPONENT: f32 = 1.8;

/// Shadow/highlight colour pair used for the remap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ColorPair {
    /// Colour for the darkest luminance.
    pub shadow: [u8; 3],
    /// Colour for the brightest luminance.
    pub highlight: [u8; 3],
}

impl ColorPair {
    /// Green shadows, pink highlights.
    pub const OPTIMIZED: Self = Self {
        shadow: [22, 80, 39],
        highlight: [249, 159, 210],
    };

    /// The original campaign palette.
    pub const CLASSIC: Self = Self {
        shadow: [27, 96, 47],
        highlight: [247, 132, 197],
    };

    /// Swap roles when `reversed` is set.
    pub fn oriented(self, reversed: bool) -> Self {
        if reversed {
            Self {
                shadow: self.highlight,
                highlight: self.shadow,
            }
        } else {
            self
        }
    }
}

/// Built-in palettes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    /// [`ColorPair::OPTIMIZED`]
    #[default]
    Optimized,
    /// [`ColorPair::CLASSIC`]
    Classic,
}

impl ColorScheme {
    /// Colours of this scheme in their natural orientation.
    pub fn colors(self) -> ColorPair {
        match self {
            Self::Optimized => ColorPair::OPTIMIZED,
            Self::Classic => ColorPair::CLASSIC,
        }
    }

    /// Parse a scheme name.
    pub fn parse(name: &str) -> DuotoneResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "optimized" | "optimised" => Ok(Self::Optimized),
            "classic" => Ok(Self::Classic),
            other => Err(DuotoneError::validation(format!(
                "unknown color scheme '{other}'"
            ))),
        }
    }
}

/// Perceptual luminance of an RGB8 triple, in 0..=255.
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    LUMA_WEIGHTS[0] * f32::from(r) + LUMA_WEIGHTS[1] * f32::from(g) + LUMA_WEIGHTS[2] * f32::from(b)
}

/// S-curve that pushes normalized luminance away from the middle.
pub fn enhance_contrast(n: f32) -> f32 {
    if n < 0.5 {
        (n * 2.0).powf(CONTRAST_EXPONENT) / 2.0
    } else {
        1.0 - ((1.0 - n) * 2.0).powf(CONTRAST_EXPONENT) / 2.0
    }
}

/// Remap every pixel's luminance onto the shadow→highlight ramp of `scheme`.
///
/// Luminance is stretched to the image's own min/max first. A flat image (min == max)
/// maps every pixel to the midpoint of the two colours. Alpha is untouched.
#[tracing::instrument(skip(buf), fields(width = buf.width(), height = buf.height()))]
pub fn apply_duotone(buf: &mut ImageBuffer, scheme: ColorScheme, reversed: bool) {
    let data = buf.data_mut();

    let mut min_l = f32::INFINITY;
    let mut max_l = f32::NEG_INFINITY;
    for px in data.chunks_exact(4) {
        let l = luminance(px[0], px[1], px[2]);
        min_l = min_l.min(l);
        max_l = max_l.max(l);
    }
    let range = max_l - min_l;
    let flat = range <= 0.0;

    let pair = scheme.colors().oriented(reversed);
    let (s, h) = (pair.shadow, pair.highlight);

    for px in data.chunks_exact_mut(4) {
        let e = if flat {
            0.5
        } else {
            let n = ((luminance(px[0], px[1], px[2]) - min_l) / range).clamp(0.0, 1.0);
            enhance_contrast(n)
        };
        for c in 0..3 {
            let sc = f32::from(s[c]);
            let hc = f32::from(h[c]);
            px[c] = clamp_channel(sc + e * (hc - sc));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/duotone.rs"]
mod tests;
