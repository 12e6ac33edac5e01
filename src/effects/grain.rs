use rand::Rng;

use crate::{buffer::ImageBuffer, config::GrainConfig, foundation::math::clamp_channel};

/// Peak noise offset, in channel units, at `amount == 1`.
pub const GRAIN_AMPLITUDE: f32 = 40.0;

/// Add monochrome noise, one uniform sample per `block_size`² tile.
///
/// Tiles are visited row-major and each draws exactly one value from `rng`, which is
/// added to R, G and B alike. Alpha is untouched.
pub fn apply_grain<R: Rng + ?Sized>(buf: &mut ImageBuffer, cfg: &GrainConfig, rng: &mut R) {
    let amount = cfg.amount.clamp(0.0, 1.0);
    if amount <= 0.0 {
        return;
    }
    let amp = GRAIN_AMPLITUDE * amount;
    let block = cfg.block_size.clamp(1, 4) as usize;
    let w = buf.width() as usize;
    let h = buf.height() as usize;
    let data = buf.data_mut();

    for ty in (0..h).step_by(block) {
        for tx in (0..w).step_by(block) {
            let n = (rng.random::<f32>() * 2.0 - 1.0) * amp;
            for y in ty..(ty + block).min(h) {
                for x in tx..(tx + block).min(w) {
                    let idx = (y * w + x) * 4;
                    for c in &mut data[idx..idx + 3] {
                        *c = clamp_channel(f32::from(*c) + n);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
