use std::{io::Cursor, path::Path};

use crate::{
    buffer::ImageBuffer,
    foundation::error::{DuotoneError, DuotoneResult},
};

/// Serialize a buffer as an 8-bit RGBA PNG.
#[tracing::instrument(skip(buf), fields(width = buf.width(), height = buf.height()))]
pub fn encode_png(buf: &ImageBuffer) -> DuotoneResult<Vec<u8>> {
    let mut out = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut out),
        buf.data(),
        buf.width(),
        buf.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| DuotoneError::encode(format!("encode png: {e}")))?;
    Ok(out)
}

/// Write a buffer to `path` as PNG, creating parent directories as needed.
pub fn write_png(path: &Path, buf: &ImageBuffer) -> DuotoneResult<()> {
    let bytes = encode_png(buf)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            DuotoneError::encode(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    std::fs::write(path, bytes)
        .map_err(|e| DuotoneError::encode(format!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
