//! Borrowed views over one captured 4:2:0 frame and its output buffer.
//!
//! A [`Frame`] never owns pixel memory. The host hands in the three input
//! planes and the packed output buffer for the duration of a single
//! processing call.

use std::fmt;

/// One input plane: bytes plus the strides that address them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaneView<'a> {
    /// Plane bytes, or `None` when the host could not supply them.
    pub data: Option<&'a [u8]>,
    /// Bytes between the starts of consecutive rows.
    pub row_stride: usize,
    /// Bytes between consecutive samples within a row.
    pub pixel_stride: usize,
}

impl<'a> PlaneView<'a> {
    pub fn new(data: &'a [u8], row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data: Some(data),
            row_stride,
            pixel_stride,
        }
    }

    /// A plane the host failed to provide.
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Identifies a plane in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneKind {
    Luma,
    ChromaA,
    ChromaB,
    Output,
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Luma => write!(f, "luma"),
            Self::ChromaA => write!(f, "chroma-a"),
            Self::ChromaB => write!(f, "chroma-b"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// A 4:2:0 frame: full-resolution luma, half-resolution chroma, and the
/// packed 32-bit output the pipeline writes.
///
/// `width` and `height` describe the luma plane; each 2×2 luma block shares
/// one chroma pair. The output holds `width` pixels per row with no padding.
#[derive(Debug, Default)]
pub struct Frame<'a> {
    pub width: usize,
    pub height: usize,
    pub luma: PlaneView<'a>,
    pub chroma_a: PlaneView<'a>,
    pub chroma_b: PlaneView<'a>,
    pub output: Option<&'a mut [u32]>,
}

/// Why a frame was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// A plane or the output buffer was not supplied.
    MissingPlane(PlaneKind),
    /// An input plane is shorter than its strides and the frame size imply.
    PlaneTooSmall {
        plane: PlaneKind,
        required: usize,
        actual: usize,
    },
    /// Frame geometry overflows the address space.
    Overflow,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlane(plane) => write!(f, "missing {plane} buffer"),
            Self::PlaneTooSmall {
                plane,
                required,
                actual,
            } => write!(f, "{plane} buffer holds {actual}, frame needs {required}"),
            Self::Overflow => write!(f, "frame geometry overflows"),
        }
    }
}

/// Outcome of one processing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Every output pixel was written.
    Rendered,
    /// Nothing was written; the next frame is processed normally.
    Dropped(DropReason),
}

impl FrameStatus {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered)
    }
}
