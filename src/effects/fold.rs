use kurbo::Point;

use crate::{
    buffer::ImageBuffer,
    composite::{
        blend::{BlendMode, composite_premul_in_place},
        layer::{GradientStop, Layer, sample_gradient},
    },
    config::FoldConfig,
    foundation::error::{DuotoneError, DuotoneResult},
};

const BAND_RATIO: f64 = 0.06;
const MIN_HALF_WIDTH: f64 = 8.0;

/// Axis the creases run along.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FoldDirection {
    /// Creases are rows spaced along the y axis.
    Horizontal,
    /// Creases are columns spaced along the x axis.
    #[default]
    Vertical,
    /// Creases cross the image centre from top-right to bottom-left; the shading axis runs
    /// from the top-left corner to the bottom-right one.
    Diagonal,
}

impl FoldDirection {
    /// Parse a direction name.
    pub fn parse(name: &str) -> DuotoneResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            "diagonal" | "d" => Ok(Self::Diagonal),
            other => Err(DuotoneError::validation(format!(
                "unknown fold direction '{other}'"
            ))),
        }
    }
}

/// Half-width of one crease band in pixels.
pub fn fold_half_width(width: u32, height: u32) -> f64 {
    (f64::from(width.min(height)) * BAND_RATIO).max(MIN_HALF_WIDTH)
}

/// Centres of the `count` creases.
///
/// Vertical and horizontal creases sit at `k * dimension / (count + 1)`; diagonal ones all
/// share the image centre.
pub fn fold_centers(direction: FoldDirection, count: u32, width: u32, height: u32) -> Vec<Point> {
    let (w, h) = (f64::from(width), f64::from(height));
    match direction {
        FoldDirection::Vertical => {
            let step = w / f64::from(count + 1);
            (1..=count)
                .map(|k| Point::new(step * f64::from(k), h / 2.0))
                .collect()
        }
        FoldDirection::Horizontal => {
            let step = h / f64::from(count + 1);
            (1..=count)
                .map(|k| Point::new(w / 2.0, step * f64::from(k)))
                .collect()
        }
        FoldDirection::Diagonal => (0..count).map(|_| Point::new(w / 2.0, h / 2.0)).collect(),
    }
}

/// Opacity of each crease composite.
pub fn fold_alpha(strength: f32) -> f32 {
    (0.25 + 0.5 * strength).min(0.7)
}

fn crease_stops(strength: f32) -> [GradientStop; 5] {
    let shadow = [0.0, 0.0, 0.0, 0.25 * strength];
    let clear = [0.0; 4];
    [
        GradientStop {
            offset: 0.0,
            rgba: clear,
        },
        GradientStop {
            offset: 0.45,
            rgba: shadow,
        },
        GradientStop {
            offset: 0.5,
            rgba: [1.0, 1.0, 1.0, 0.35 * strength],
        },
        GradientStop {
            offset: 0.55,
            rgba: shadow,
        },
        GradientStop {
            offset: 1.0,
            rgba: clear,
        },
    ]
}

/// Overlay shadow/highlight crease bands onto the image.
pub fn apply_paper_folds(buf: &mut ImageBuffer, cfg: &FoldConfig) -> DuotoneResult<()> {
    let strength = cfg.strength.clamp(0.0, 1.0);
    if !cfg.enabled || strength <= 0.0 || cfg.count == 0 {
        return Ok(());
    }

    let (width, height) = (buf.width(), buf.height());
    let (w, h) = (f64::from(width), f64::from(height));
    let band = fold_half_width(width, height);
    let stops = crease_stops(strength);
    let alpha = fold_alpha(strength);

    for center in fold_centers(cfg.direction, cfg.count, width, height) {
        let mut layer = Layer::new(width, height);
        match cfg.direction {
            FoldDirection::Vertical => layer.fill_with(|p| {
                sample_gradient(&stops, ((p.x - (center.x - band)) / (2.0 * band)) as f32)
            }),
            FoldDirection::Horizontal => layer.fill_with(|p| {
                sample_gradient(&stops, ((p.y - (center.y - band)) / (2.0 * band)) as f32)
            }),
            FoldDirection::Diagonal => {
                let len2 = w * w + h * h;
                layer.fill_with(|p| sample_gradient(&stops, ((p.x * w + p.y * h) / len2) as f32))
            }
        }
        composite_premul_in_place(buf, &layer.to_premul_rgba8(), BlendMode::Overlay, alpha)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fold.rs"]
mod tests;
