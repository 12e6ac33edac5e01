use image::imageops::FilterType;

use crate::{
    buffer::ImageBuffer,
    foundation::error::{DuotoneError, DuotoneResult},
};

/// Longest side, in pixels, an input is allowed to keep after decoding.
pub const MAX_DIMENSION: u32 = 3000;

/// Scale `(width, height)` so the longer side is at most `max_side`.
///
/// Aspect ratio is preserved and each side is rounded to the nearest integer. Inputs that
/// already fit are returned unchanged. A very thin input can round a side down to zero;
/// callers treat that as a dimension error.
pub fn constrain_dimensions(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    if width <= max_side && height <= max_side {
        return (width, height);
    }
    let scale = f64::from(max_side) / f64::from(width.max(height));
    let w = (f64::from(width) * scale).round() as u32;
    let h = (f64::from(height) * scale).round() as u32;
    (w.min(max_side), h.min(max_side))
}

/// Decode PNG/JPEG bytes into a straight RGBA8 buffer capped at [`MAX_DIMENSION`].
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> DuotoneResult<ImageBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| DuotoneError::decode(format!("decode image from memory: {e}")))?;
    let (src_w, src_h) = (dyn_img.width(), dyn_img.height());
    if src_w == 0 || src_h == 0 {
        return Err(DuotoneError::dimension(format!(
            "decoded image is {src_w}x{src_h}"
        )));
    }

    let (width, height) = constrain_dimensions(src_w, src_h, MAX_DIMENSION);
    if width == 0 || height == 0 {
        return Err(DuotoneError::dimension(format!(
            "{src_w}x{src_h} collapses to {width}x{height} when capped at {MAX_DIMENSION}px"
        )));
    }

    let rgba = dyn_img.to_rgba8();
    let rgba = if (width, height) == (src_w, src_h) {
        rgba
    } else {
        tracing::debug!(src_w, src_h, width, height, "downscaling source");
        image::imageops::resize(&rgba, width, height, FilterType::Triangle)
    };

    ImageBuffer::from_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
