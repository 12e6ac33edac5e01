use std::f64::consts::TAU;

use kurbo::{Line, Point, Vec2};
use rand::Rng;

use crate::{
    assets::textures::TextureLibrary,
    buffer::ImageBuffer,
    composite::{
        blend::{BlendMode, composite_premul_in_place},
        blur::box_blur_rgba8_premul,
        layer::Layer,
    },
    config::GrungeConfig,
    foundation::error::DuotoneResult,
};

const INK: [f32; 3] = [30.0 / 255.0, 30.0 / 255.0, 30.0 / 255.0];
const LAYER_BLUR_SIGMA: f32 = 0.6;

/// Provider of the grunge layer. Exactly one is active per invocation.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GrungeSource {
    /// Blotches, speckles and scratches generated from the random source.
    #[default]
    Procedural,
    /// A pre-authored texture from the [`TextureLibrary`], stretched to the canvas.
    Texture {
        /// Zero-based index into the library.
        index: usize,
    },
}

/// Opacity of the first composite pass (configured blend mode).
pub fn primary_alpha(amount: f32) -> f32 {
    (0.2 + 0.4 * amount).min(0.6)
}

/// Opacity of the second composite pass (overlay).
pub fn overlay_alpha(amount: f32) -> f32 {
    (0.12 + 0.2 * amount).min(0.35)
}

/// Element counts for a `width`x`height` canvas: (blotches, speckles, scratches).
pub fn element_counts(width: u32, height: u32, amount: f32) -> (usize, usize, usize) {
    let area = f64::from(width) * f64::from(height);
    let density = f64::from(amount.max(0.1));
    let blotches = (area / (90_000.0 / density)).round() as usize;
    let speckles = (area / (12_000.0 / density)).round() as usize;
    let scratches = (30.0 * f64::from(amount)).round() as usize;
    (blotches, speckles, scratches)
}

/// Render the procedural grunge layer as premultiplied RGBA8, lightly blurred.
pub fn procedural_layer<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    amount: f32,
    scale: f32,
    rng: &mut R,
) -> DuotoneResult<Vec<u8>> {
    let amount = amount.clamp(0.0, 1.0);
    let scale = f64::from(scale);
    let (w, h) = (f64::from(width), f64::from(height));
    let (blotches, speckles, scratches) = element_counts(width, height, amount);
    let mut layer = Layer::new(width, height);

    let blotch_radius = w.min(h) / (18.0 + (100.0 - scale) * 0.12);
    for _ in 0..blotches {
        let center = Point::new(rng.random::<f64>() * w, rng.random::<f64>() * h);
        let radius = (rng.random::<f64>() * 0.5 + 0.5) * blotch_radius;
        let shade = (180.0 + rng.random::<f32>() * 40.0).floor() / 255.0;
        layer.fill_radial(center, radius, [shade; 3], 0.12 * amount);
    }

    for _ in 0..speckles {
        let origin = Point::new(
            (rng.random::<f64>() * w).floor(),
            (rng.random::<f64>() * h).floor(),
        );
        let size = 1.0 + rng.random::<f64>() * (scale / 50.0);
        layer.fill_rect(origin, size, size, INK, 0.12 * amount);
    }

    let stroke_width = (scale / 200.0).max(0.5);
    for _ in 0..scratches {
        let start = Point::new(rng.random::<f64>() * w, rng.random::<f64>() * h);
        let len = (rng.random::<f64>() * 0.2 + 0.1) * w.max(h);
        let angle = rng.random::<f64>() * TAU;
        let end = start + Vec2::from_angle(angle) * len;
        layer.stroke_line(Line::new(start, end), stroke_width, INK, 0.25 * amount);
    }

    box_blur_rgba8_premul(&layer.to_premul_rgba8(), width, height, LAYER_BLUR_SIGMA)
}

/// Composite a grunge layer onto `buf` in two passes.
///
/// The first pass uses `cfg.blend_mode` at [`primary_alpha`], the second overlay at
/// [`overlay_alpha`]. `amount <= 0` skips the stage without touching `rng`.
#[tracing::instrument(skip(buf, textures, rng), fields(width = buf.width(), height = buf.height()))]
pub fn apply_grunge<R: Rng + ?Sized>(
    buf: &mut ImageBuffer,
    cfg: &GrungeConfig,
    textures: &TextureLibrary,
    rng: &mut R,
) -> DuotoneResult<()> {
    if cfg.amount <= 0.0 {
        return Ok(());
    }
    let amount = cfg.amount.min(1.0);
    let layer = match cfg.source {
        GrungeSource::Procedural => {
            procedural_layer(buf.width(), buf.height(), amount, cfg.scale, rng)?
        }
        GrungeSource::Texture { index } => {
            textures.premul_layer(index, buf.width(), buf.height())?
        }
    };

    composite_premul_in_place(buf, &layer, cfg.blend_mode, primary_alpha(amount))?;
    composite_premul_in_place(buf, &layer, BlendMode::Overlay, overlay_alpha(amount))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grunge.rs"]
mod tests;
