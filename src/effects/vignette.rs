use crate::{buffer::ImageBuffer, config::VignetteConfig, foundation::math::clamp_channel};

/// Softness floor; keeps the falloff division finite.
pub const MIN_SOFTNESS: f32 = 0.001;

/// Darken RGB by radial distance from the image centre.
///
/// `r` is the distance to the centre divided by the centre-to-corner distance. Pixels with
/// `r < 1 - softness` are untouched; beyond that the gain ramps linearly down to
/// `1 - strength` at the corners. Alpha is untouched.
pub fn apply_vignette(buf: &mut ImageBuffer, cfg: &VignetteConfig) {
    let strength = cfg.strength.clamp(0.0, 1.0);
    if strength <= 0.0 {
        return;
    }
    let soft = cfg.softness.clamp(0.0, 1.0).max(MIN_SOFTNESS);

    let w = buf.width() as usize;
    let cx = buf.width() as f32 / 2.0;
    let cy = buf.height() as f32 / 2.0;
    let max_r = cx.hypot(cy);

    for (idx, px) in buf.data_mut().chunks_exact_mut(4).enumerate() {
        let x = (idx % w) as f32;
        let y = (idx / w) as f32;
        let r = (x - cx).hypot(y - cy) / max_r;
        let t = ((r - (1.0 - soft)) / soft).clamp(0.0, 1.0);
        let v = 1.0 - t * strength;
        for c in &mut px[..3] {
            *c = clamp_channel(f32::from(*c) * v);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/vignette.rs"]
mod tests;
