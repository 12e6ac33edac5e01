use crate::{
    buffer::ImageBuffer,
    composite::{
        blend::composite_premul_in_place,
        layer::{GradientStop, Layer, sample_gradient},
    },
    config::CampaignConfig,
    effects::duotone::luminance,
    foundation::{
        error::{DuotoneError, DuotoneResult},
        math::clamp_channel,
    },
};

/// Brave Pink, `#E064A6`.
pub const BRAVE_PINK: [u8; 3] = [0xE0, 0x64, 0xA6];
/// Hero Green, `#05AB1C`.
pub const HERO_GREEN: [u8; 3] = [0x05, 0xAB, 0x1C];

/// What the campaign pass lays over the image.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CampaignMode {
    /// Flat [`BRAVE_PINK`] layer.
    Pink,
    /// Flat [`HERO_GREEN`] layer.
    Green,
    /// Linear pink-to-green layer from the top-left corner to the bottom-right one.
    #[default]
    Gradient,
    /// Pink shadows, green highlights, mixed into the image by strength. Ignores the blend mode.
    Duotone,
}

impl CampaignMode {
    /// Parse a mode name.
    pub fn parse(name: &str) -> DuotoneResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pink" | "brave-pink" => Ok(Self::Pink),
            "green" | "hero-green" => Ok(Self::Green),
            "gradient" => Ok(Self::Gradient),
            "duotone" => Ok(Self::Duotone),
            other => Err(DuotoneError::validation(format!(
                "unknown campaign mode '{other}'"
            ))),
        }
    }
}

fn unit_rgb(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(|c| f32::from(c) / 255.0)
}

/// Opaque pink-to-green layer along the top-left to bottom-right axis.
fn gradient_layer(width: u32, height: u32) -> Vec<u8> {
    let [pr, pg, pb] = unit_rgb(BRAVE_PINK);
    let [gr, gg, gb] = unit_rgb(HERO_GREEN);
    let stops = [
        GradientStop {
            offset: 0.0,
            rgba: [pr, pg, pb, 1.0],
        },
        GradientStop {
            offset: 1.0,
            rgba: [gr, gg, gb, 1.0],
        },
    ];
    let (w, h) = (f64::from(width), f64::from(height));
    let len2 = w * w + h * h;

    let mut layer = Layer::new(width, height);
    layer.fill_with(|p| sample_gradient(&stops, ((p.x * w + p.y * h) / len2) as f32));
    layer.to_premul_rgba8()
}

/// Blend every pixel towards a pink/green duotone of its own luminance by `strength`.
fn mix_duotone(buf: &mut ImageBuffer, strength: f32) {
    for px in buf.data_mut().chunks_exact_mut(4) {
        let lum = luminance(px[0], px[1], px[2]) / 255.0;
        for c in 0..3 {
            let tone = clamp_channel(
                f32::from(BRAVE_PINK[c]) * (1.0 - lum) + f32::from(HERO_GREEN[c]) * lum,
            );
            let mixed = f32::from(px[c]) * (1.0 - strength) + f32::from(tone) * strength;
            px[c] = clamp_channel(mixed);
        }
    }
}

/// Lay the campaign colours over the image. Alpha is untouched.
pub fn apply_campaign(buf: &mut ImageBuffer, cfg: &CampaignConfig) -> DuotoneResult<()> {
    let strength = cfg.strength.clamp(0.0, 1.0);
    if strength <= 0.0 {
        return Ok(());
    }

    let (width, height) = (buf.width(), buf.height());
    let layer = match cfg.mode {
        CampaignMode::Duotone => {
            mix_duotone(buf, strength);
            return Ok(());
        }
        CampaignMode::Pink => {
            let [r, g, b] = BRAVE_PINK;
            [r, g, b, 255].repeat(width as usize * height as usize)
        }
        CampaignMode::Green => {
            let [r, g, b] = HERO_GREEN;
            [r, g, b, 255].repeat(width as usize * height as usize)
        }
        CampaignMode::Gradient => gradient_layer(width, height),
    };
    composite_premul_in_place(buf, &layer, cfg.blend_mode, strength)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/campaign.rs"]
mod tests;
