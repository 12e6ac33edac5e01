use crate::{
    buffer::ImageBuffer,
    foundation::{
        error::{DuotoneError, DuotoneResult},
        math::unit_to_channel,
    },
};

/// Separable blend operators used when compositing a layer onto the image.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Plain source-over.
    #[default]
    Normal,
    /// `cb * cs`
    Multiply,
    /// `cb + cs - cb * cs`
    Screen,
    /// Multiply or screen depending on the backdrop.
    Overlay,
    /// W3C soft-light.
    SoftLight,
}

impl BlendMode {
    /// Parse a blend mode name; accepts kebab, snake and squashed spellings.
    pub fn parse(name: &str) -> DuotoneResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" | "source-over" => Ok(Self::Normal),
            "multiply" => Ok(Self::Multiply),
            "screen" => Ok(Self::Screen),
            "overlay" => Ok(Self::Overlay),
            "soft-light" | "soft_light" | "softlight" => Ok(Self::SoftLight),
            other => Err(DuotoneError::validation(format!(
                "unknown blend mode '{other}'"
            ))),
        }
    }

    /// Blend one channel; `cb` is the backdrop, `cs` the source, both in 0..=1.
    pub fn blend(self, cb: f32, cs: f32) -> f32 {
        match self {
            Self::Normal => cs,
            Self::Multiply => cb * cs,
            Self::Screen => cb + cs - cb * cs,
            Self::Overlay => hard_light(cs, cb),
            Self::SoftLight => soft_light(cb, cs),
        }
    }
}

fn hard_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb * 2.0 * cs
    } else {
        let s = 2.0 * cs - 1.0;
        cb + s - cb * s
    }
}

fn soft_light(cb: f32, cs: f32) -> f32 {
    if cs <= 0.5 {
        cb - (1.0 - 2.0 * cs) * cb * (1.0 - cb)
    } else {
        let d = if cb <= 0.25 {
            ((16.0 * cb - 12.0) * cb + 4.0) * cb
        } else {
            cb.sqrt()
        };
        cb + (2.0 * cs - 1.0) * (d - cb)
    }
}

/// Composite a premultiplied RGBA8 layer atop `dst` with `mode` at `opacity`.
///
/// The layer only ever tints: destination alpha is kept as is, and each colour channel
/// moves from the backdrop towards `mode.blend(backdrop, source)` by the effective source
/// alpha. Fully transparent layer pixels leave the destination untouched.
pub fn composite_premul_in_place(
    dst: &mut ImageBuffer,
    layer: &[u8],
    mode: BlendMode,
    opacity: f32,
) -> DuotoneResult<()> {
    if dst.data().len() != layer.len() {
        return Err(DuotoneError::validation(
            "composite expects a layer matching the destination size",
        ));
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return Ok(());
    }

    for (d, s) in dst.data_mut().chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let sa = f32::from(s[3]) / 255.0;
        let a = sa * opacity;
        for c in 0..3 {
            let cb = f32::from(d[c]) / 255.0;
            let cs = (f32::from(s[c]) / 255.0 / sa).min(1.0);
            let b = mode.blend(cb, cs);
            d[c] = unit_to_channel(cb + a * (b - cb));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
