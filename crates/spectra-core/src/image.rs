//! Owned packed-pixel frames and PNG export.

use std::path::Path;

use image::RgbaImage;

use crate::error::{ImageError, ImageResult};
use crate::processor::OPAQUE_ALPHA;

/// A frame of packed `0xAA_BB_GG_RR` pixels, row-major with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// `width * height` packed pixels.
    pub pixels: Vec<u32>,
}

impl PackedImage {
    /// An opaque black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![OPAQUE_ALPHA; width as usize * height as usize],
        }
    }

    /// Borrow the pixels as a frame output buffer.
    pub fn frame_output(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Red, green, blue and alpha of the pixel at `(x, y)`.
    pub fn rgba_at(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize].to_le_bytes()
    }

    /// Unpack into an 8-bit RGBA image.
    pub fn to_rgba_image(&self) -> ImageResult<RgbaImage> {
        let required = self.width as usize * self.height as usize;
        if self.pixels.len() != required {
            return Err(ImageError::Dimensions {
                width: self.width,
                height: self.height,
                required,
                actual: self.pixels.len(),
            });
        }
        let bytes: Vec<u8> = self.pixels.iter().flat_map(|p| p.to_le_bytes()).collect();
        RgbaImage::from_raw(self.width, self.height, bytes).ok_or(ImageError::Dimensions {
            width: self.width,
            height: self.height,
            required,
            actual: self.pixels.len(),
        })
    }

    /// Write the image as a PNG file.
    pub fn save_png(&self, path: &Path) -> ImageResult<()> {
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}
