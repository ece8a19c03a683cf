//! Raw 4:2:0 frame files and the plane views the pipeline reads from them.

use std::fs;
use std::path::Path;

use spectra_core::{ChromaLayout, Frame, PlaneView};

use crate::config::RawFormat;

/// A raw frame file held in memory.
///
/// Planes are tightly packed: luma rows of `width` bytes, then chroma at
/// half resolution in each direction, rounded up.
pub struct RawFrame {
    pub width: usize,
    pub height: usize,
    pub format: RawFormat,
    bytes: Vec<u8>,
}

impl RawFrame {
    pub fn load(path: &Path, width: usize, height: usize, format: RawFormat) -> Result<Self, RawLoadError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes, width, height, format)
    }

    pub fn from_bytes(
        bytes: Vec<u8>,
        width: usize,
        height: usize,
        format: RawFormat,
    ) -> Result<Self, RawLoadError> {
        if width == 0 || height == 0 {
            return Err(RawLoadError::EmptyFrame { width, height });
        }
        let Some(expected) = frame_size(width, height) else {
            return Err(RawLoadError::TooLarge { width, height });
        };
        if bytes.len() != expected {
            return Err(RawLoadError::Size {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            bytes,
        })
    }

    /// Plane views plus the layout they imply, detected from pixel strides
    /// and the order of the chroma views in memory.
    pub fn planes(&self) -> (ChromaLayout, [PlaneView<'_>; 3]) {
        let (luma, chroma) = self.bytes.split_at(self.width * self.height);
        let chroma_width = self.width.div_ceil(2);
        let luma = PlaneView::new(luma, self.width, 1);

        let (a, b) = match self.format {
            RawFormat::I420 => {
                let (u, v) = chroma.split_at(chroma.len() / 2);
                (
                    PlaneView::new(u, chroma_width, 1),
                    PlaneView::new(v, chroma_width, 1),
                )
            }
            RawFormat::Nv12 => (
                PlaneView::new(chroma, chroma_width * 2, 2),
                PlaneView::new(&chroma[1..], chroma_width * 2, 2),
            ),
            RawFormat::Nv21 => (
                PlaneView::new(&chroma[1..], chroma_width * 2, 2),
                PlaneView::new(chroma, chroma_width * 2, 2),
            ),
        };

        let layout = match (a.data, b.data) {
            (Some(a_bytes), Some(b_bytes)) => ChromaLayout::detect(
                a.pixel_stride,
                b.pixel_stride,
                a_bytes.as_ptr() < b_bytes.as_ptr(),
            ),
            _ => ChromaLayout::Unknown,
        };
        (layout, [luma, a, b])
    }

    /// The chroma layout this file's planes should be decoded with.
    pub fn layout(&self) -> ChromaLayout {
        self.planes().0
    }

    /// A frame borrowing this file's planes and writing into `output`.
    pub fn frame<'a>(&'a self, output: &'a mut [u32]) -> Frame<'a> {
        let (_, [luma, chroma_a, chroma_b]) = self.planes();
        Frame {
            width: self.width,
            height: self.height,
            luma,
            chroma_a,
            chroma_b,
            output: Some(output),
        }
    }
}

/// Bytes in a tightly packed 4:2:0 frame, or `None` on overflow.
pub fn frame_size(width: usize, height: usize) -> Option<usize> {
    let luma = width.checked_mul(height)?;
    let chroma = width
        .div_ceil(2)
        .checked_mul(height.div_ceil(2))?
        .checked_mul(2)?;
    luma.checked_add(chroma)
}

/// Errors that can occur while loading a raw frame.
#[derive(Debug, thiserror::Error)]
pub enum RawLoadError {
    #[error("frame must have a non-zero size, got {width}x{height}")]
    EmptyFrame { width: usize, height: usize },

    #[error("a {width}x{height} frame is too large to address")]
    TooLarge { width: usize, height: usize },

    #[error("a {width}x{height} frame needs {expected} bytes, file has {actual}")]
    Size {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
