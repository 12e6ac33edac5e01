use crate::{
    buffer::ImageBuffer,
    composite::{
        blend::{BlendMode, composite_premul_in_place},
        blur::box_blur_rgba8_premul,
        premultiply_rgba8_in_place,
    },
    config::GlowConfig,
    foundation::error::DuotoneResult,
};

/// Screen a blurred copy of the image back onto itself at `strength`.
pub fn apply_soft_glow(buf: &mut ImageBuffer, cfg: &GlowConfig) -> DuotoneResult<()> {
    let strength = cfg.strength.clamp(0.0, 1.0);
    if strength <= 0.0 || cfg.blur_px <= 0.0 {
        return Ok(());
    }

    let mut copy = buf.data().to_vec();
    premultiply_rgba8_in_place(&mut copy);
    let blurred = box_blur_rgba8_premul(&copy, buf.width(), buf.height(), cfg.blur_px)?;
    composite_premul_in_place(buf, &blurred, BlendMode::Screen, strength)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/glow.rs"]
mod tests;
