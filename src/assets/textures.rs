use std::path::Path;

use image::imageops::FilterType;

use crate::{
    assets::decode::decode_image,
    buffer::ImageBuffer,
    composite::premultiply_rgba8_in_place,
    foundation::error::{DuotoneError, DuotoneResult},
};

/// Pre-authored grunge textures, addressed by a zero-based index.
#[derive(Clone, Debug, Default)]
pub struct TextureLibrary {
    textures: Vec<ImageBuffer>,
}

impl TextureLibrary {
    /// An empty library. Only the procedural grunge source is usable with it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from already decoded textures.
    pub fn from_textures(textures: Vec<ImageBuffer>) -> Self {
        Self { textures }
    }

    /// Load `1.png`, `2.png`, ... from `dir`, stopping at the first missing file.
    pub fn from_dir(dir: &Path) -> DuotoneResult<Self> {
        let mut textures = Vec::new();
        loop {
            let path = dir.join(format!("{}.png", textures.len() + 1));
            if !path.is_file() {
                break;
            }
            let bytes = std::fs::read(&path).map_err(|e| {
                DuotoneError::decode(format!("read texture '{}': {e}", path.display()))
            })?;
            textures.push(decode_image(&bytes)?);
        }
        tracing::debug!(dir = %dir.display(), count = textures.len(), "loaded grunge textures");
        Ok(Self { textures })
    }

    /// Number of textures available.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether the library holds no textures.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Texture at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&ImageBuffer> {
        self.textures.get(index)
    }

    /// Stretch texture `index` to `width`x`height` and return it premultiplied.
    pub(crate) fn premul_layer(
        &self,
        index: usize,
        width: u32,
        height: u32,
    ) -> DuotoneResult<Vec<u8>> {
        let tex = self.get(index).ok_or_else(|| {
            DuotoneError::validation(format!(
                "grunge texture index {index} is out of range (library has {})",
                self.len()
            ))
        })?;

        let mut data = if (tex.width(), tex.height()) == (width, height) {
            tex.data().to_vec()
        } else {
            let img = image::RgbaImage::from_raw(tex.width(), tex.height(), tex.data().to_vec())
                .ok_or_else(|| DuotoneError::validation("texture buffer size mismatch"))?;
            image::imageops::resize(&img, width, height, FilterType::Triangle).into_raw()
        };
        premultiply_rgba8_in_place(&mut data);
        Ok(data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/textures.rs"]
mod tests;
