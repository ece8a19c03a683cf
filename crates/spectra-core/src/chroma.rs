//! Chroma layout resolution: locating the luma/chroma triple for a pixel.
//!
//! Cameras deliver 4:2:0 chroma in one of several memory layouts. The
//! decoder hides the difference so the rest of the pipeline only sees
//! `(luma, chroma-a, chroma-b)` where chroma-a is the blue-difference
//! channel (U/Cb) and chroma-b the red-difference channel (V/Cr).

use serde::{Deserialize, Serialize};
use std::fmt;

/// How chroma samples are laid out in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChromaLayout {
    /// Layout not determined. Decodes as [`ChromaLayout::SemiPlanarBa`].
    #[default]
    Unknown,
    /// Separate chroma-a and chroma-b planes, each with its own pixel stride.
    Planar,
    /// One interleaved plane, chroma-a at even offsets (NV12).
    SemiPlanarAb,
    /// One interleaved plane, chroma-b at even offsets (NV21).
    SemiPlanarBa,
}

impl ChromaLayout {
    /// Map a host command code to a layout. Unrecognized codes fall back
    /// to [`ChromaLayout::Unknown`].
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Planar,
            2 => Self::SemiPlanarAb,
            3 => Self::SemiPlanarBa,
            _ => Self::Unknown,
        }
    }

    /// The host command code for this layout.
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Planar => 1,
            Self::SemiPlanarAb => 2,
            Self::SemiPlanarBa => 3,
        }
    }

    /// Infer the layout from how the capture source describes its chroma
    /// planes.
    ///
    /// Pixel stride 1 on both planes means separate planes. Pixel stride 2
    /// on both means the two views alias one interleaved buffer, and the
    /// view that starts first owns the even offsets.
    pub fn detect(pixel_stride_a: usize, pixel_stride_b: usize, a_precedes_b: bool) -> Self {
        match (pixel_stride_a, pixel_stride_b) {
            (1, 1) => Self::Planar,
            (2, 2) if a_precedes_b => Self::SemiPlanarAb,
            (2, 2) => Self::SemiPlanarBa,
            _ => Self::Unknown,
        }
    }

    /// The layout actually used for decoding.
    pub const fn effective(self) -> Self {
        match self {
            Self::Unknown => Self::SemiPlanarBa,
            other => other,
        }
    }

    /// Short label for logs and command-line parsing.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Planar => "planar",
            Self::SemiPlanarAb => "nv12",
            Self::SemiPlanarBa => "nv21",
        }
    }

    /// Resolve the `(luma, chroma-a, chroma-b)` triple at `(x, y)`.
    ///
    /// `swap` only affects [`ChromaLayout::Planar`]: it exchanges the two
    /// chroma values after lookup. Coordinates must lie inside the frame
    /// the planes were validated for.
    #[inline]
    pub fn sample(self, planes: &YuvPlanes<'_>, swap: bool, x: usize, y: usize) -> [u8; 3] {
        match self.effective() {
            Self::Planar => planes.sample_planar(swap, x, y),
            Self::SemiPlanarAb => planes.sample_ab(x, y),
            _ => planes.sample_ba(x, y),
        }
    }
}

impl fmt::Display for ChromaLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Input planes of a frame after the host's buffers have been resolved.
#[derive(Debug, Clone, Copy)]
pub struct YuvPlanes<'a> {
    pub luma: &'a [u8],
    pub luma_row_stride: usize,
    pub chroma_a: &'a [u8],
    pub a_row_stride: usize,
    pub a_pixel_stride: usize,
    pub chroma_b: &'a [u8],
    pub b_row_stride: usize,
    pub b_pixel_stride: usize,
}

impl YuvPlanes<'_> {
    #[inline(always)]
    pub(crate) fn luma_at(&self, x: usize, y: usize) -> u8 {
        self.luma[y * self.luma_row_stride + x]
    }

    #[inline(always)]
    pub(crate) fn sample_planar(&self, swap: bool, x: usize, y: usize) -> [u8; 3] {
        let row = y >> 1;
        let col = x >> 1;
        let a = self.chroma_a[row * self.a_row_stride + col * self.a_pixel_stride];
        let b = self.chroma_b[row * self.b_row_stride + col * self.b_pixel_stride];
        let (a, b) = if swap { (b, a) } else { (a, b) };
        [self.luma_at(x, y), a, b]
    }

    #[inline(always)]
    pub(crate) fn sample_ab(&self, x: usize, y: usize) -> [u8; 3] {
        let base = (y >> 1) * self.a_row_stride + (x & !1);
        [self.luma_at(x, y), self.chroma_a[base], self.chroma_a[base + 1]]
    }

    #[inline(always)]
    pub(crate) fn sample_ba(&self, x: usize, y: usize) -> [u8; 3] {
        let base = (y >> 1) * self.b_row_stride + (x & !1);
        [self.luma_at(x, y), self.chroma_b[base + 1], self.chroma_b[base]]
    }
}

/// Minimum byte lengths each input plane needs for a `width`×`height` frame.
///
/// Returns `None` on arithmetic overflow. Planes a layout does not read
/// get a requirement of zero. `width` and `height` must be non-zero.
pub(crate) fn required_lengths(
    layout: ChromaLayout,
    planes: &YuvPlanes<'_>,
    width: usize,
    height: usize,
) -> Option<[usize; 3]> {
    let last_x = width - 1;
    let last_y = height - 1;
    let luma = last_y
        .checked_mul(planes.luma_row_stride)?
        .checked_add(width)?;

    let last_row = last_y >> 1;
    let last_col = last_x >> 1;
    let interleaved = |row_stride: usize| -> Option<usize> {
        last_row
            .checked_mul(row_stride)?
            .checked_add(last_x & !1)?
            .checked_add(2)
    };
    let separate = |row_stride: usize, pixel_stride: usize| -> Option<usize> {
        last_row
            .checked_mul(row_stride)?
            .checked_add(last_col.checked_mul(pixel_stride)?)?
            .checked_add(1)
    };

    let (a, b) = match layout.effective() {
        ChromaLayout::Planar => (
            separate(planes.a_row_stride, planes.a_pixel_stride)?,
            separate(planes.b_row_stride, planes.b_pixel_stride)?,
        ),
        ChromaLayout::SemiPlanarAb => (interleaved(planes.a_row_stride)?, 0),
        _ => (0, interleaved(planes.b_row_stride)?),
    };
    Some([luma, a, b])
}
