use crate::foundation::error::{DuotoneError, DuotoneResult};

/// Decoded raster owned by one pipeline invocation.
///
/// Pixels are straight (non-premultiplied) RGBA8, row-major and tightly packed, so
/// `data.len() == 4 * width * height` always holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Wrap raw RGBA8 pixels, rejecting zero-sized sides and mismatched lengths.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> DuotoneResult<Self> {
        let expected = rgba8_len(width, height)?;
        if data.len() != expected {
            return Err(DuotoneError::validation(format!(
                "rgba8 buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer where every pixel is `px`.
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> DuotoneResult<Self> {
        let len = rgba8_len(width, height)?;
        Self::from_rgba8(width, height, px.repeat(len / 4))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major straight RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the pixels. The length cannot change through a slice.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its pixels.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }
}

pub(crate) fn rgba8_len(width: u32, height: u32) -> DuotoneResult<usize> {
    if width == 0 || height == 0 {
        return Err(DuotoneError::dimension(format!(
            "image must have non-zero sides, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| DuotoneError::dimension("rgba8 buffer size overflow"))
}

#[cfg(test)]
#[path = "../tests/unit/buffer.rs"]
mod tests;
