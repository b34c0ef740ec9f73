//! CPU-side texture decoding (RGBA8) before GPU upload.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Pixel layouts the loaders produce.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureFormat {
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::Rgba8 => 4,
        }
    }
}

/// Decoded image data.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl TextureData {
    /// Wrap raw RGBA8 bytes. The buffer length must match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            bail!(
                "RGBA8 buffer is {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            );
        }
        Ok(Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    /// Decode an image file into RGBA8.
    pub fn from_image_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("failed to decode image: {}", path.display()))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {} as {}x{} RGBA8", path.display(), width, height);

        Self::from_rgba8(width, height, rgba.into_raw())
    }

    /// White/gray checkerboard with `cell`-pixel squares. Stand-in for
    /// missing textures.
    pub fn checkerboard(size: u32, cell: u32) -> Self {
        let cell = cell.max(1);
        let mut data = Vec::with_capacity((size as usize) * (size as usize) * 4);
        for y in 0..size {
            for x in 0..size {
                let white = ((x / cell) + (y / cell)) % 2 == 0;
                data.extend_from_slice(if white {
                    &[255, 255, 255, 255]
                } else {
                    &[128, 128, 128, 255]
                });
            }
        }
        Self {
            data,
            width: size,
            height: size,
            format: TextureFormat::Rgba8,
        }
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        self.format.bytes_per_pixel()
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == (self.width * self.height * self.bytes_per_pixel()) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_checks_buffer_size() {
        assert!(TextureData::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(TextureData::from_rgba8(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn checkerboard_is_valid_and_alternates() {
        let tex = TextureData::checkerboard(16, 8);
        assert!(tex.is_valid());
        assert_eq!(tex.bytes_per_pixel(), 4);

        // Top-left cell is white, the one to its right is gray.
        assert_eq!(tex.data[0], 255);
        let right = (8 * 4) as usize;
        assert_eq!(tex.data[right], 128);
    }

    #[test]
    fn zero_sized_texture_is_invalid() {
        let tex = TextureData::checkerboard(0, 8);
        assert!(!tex.is_valid());
    }
}
