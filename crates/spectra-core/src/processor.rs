//! Per-frame orchestration: decode, convert, grade and pack every pixel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::chroma::{ChromaLayout, YuvPlanes, required_lengths};
use crate::color::ycbcr_to_rgb;
use crate::config::FrameConfig;
use crate::frame::{DropReason, Frame, FrameStatus, PlaneKind};
use crate::transform::lut::{self, ColorGrid};

/// Alpha byte of every packed output pixel.
pub const OPAQUE_ALPHA: u32 = 0xFF00_0000;

/// How rows are scheduled across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Execution {
    /// Rows run in order on the calling thread.
    #[default]
    Sequential,
    /// Rows are spread over the rayon thread pool.
    Parallel,
}

/// Options for a [`FrameProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessorOptions {
    pub execution: Execution,
}

/// Turns a 4:2:0 frame into packed 32-bit pixels, grading through the
/// configured grid on the way.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameProcessor {
    options: ProcessorOptions,
}

impl FrameProcessor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ProcessorOptions {
        self.options
    }

    /// Process one frame under `config`.
    ///
    /// Writes all `width * height` output pixels, or nothing at all when a
    /// buffer is missing or too small for the frame's strides. The output
    /// buffer is never read.
    pub fn process(&self, frame: &mut Frame<'_>, config: &FrameConfig) -> FrameStatus {
        let status = self.render(frame, config);
        if let FrameStatus::Dropped(reason) = status {
            tracing::debug!(width = frame.width, height = frame.height, %reason, "frame dropped");
        }
        status
    }

    fn render(&self, frame: &mut Frame<'_>, config: &FrameConfig) -> FrameStatus {
        let Some(luma) = frame.luma.data else {
            return FrameStatus::Dropped(DropReason::MissingPlane(PlaneKind::Luma));
        };
        let Some(chroma_a) = frame.chroma_a.data else {
            return FrameStatus::Dropped(DropReason::MissingPlane(PlaneKind::ChromaA));
        };
        let Some(chroma_b) = frame.chroma_b.data else {
            return FrameStatus::Dropped(DropReason::MissingPlane(PlaneKind::ChromaB));
        };
        let (width, height) = (frame.width, frame.height);
        let Some(output) = frame.output.as_deref_mut() else {
            return FrameStatus::Dropped(DropReason::MissingPlane(PlaneKind::Output));
        };

        if width == 0 || height == 0 {
            return FrameStatus::Rendered;
        }

        let planes = YuvPlanes {
            luma,
            luma_row_stride: frame.luma.row_stride,
            chroma_a,
            a_row_stride: frame.chroma_a.row_stride,
            a_pixel_stride: frame.chroma_a.pixel_stride,
            chroma_b,
            b_row_stride: frame.chroma_b.row_stride,
            b_pixel_stride: frame.chroma_b.pixel_stride,
        };

        let Some(required) = required_lengths(config.layout, &planes, width, height) else {
            return FrameStatus::Dropped(DropReason::Overflow);
        };
        let available = [luma.len(), chroma_a.len(), chroma_b.len()];
        let kinds = [PlaneKind::Luma, PlaneKind::ChromaA, PlaneKind::ChromaB];
        for ((required, actual), plane) in required.into_iter().zip(available).zip(kinds) {
            if actual < required {
                return FrameStatus::Dropped(DropReason::PlaneTooSmall {
                    plane,
                    required,
                    actual,
                });
            }
        }
        let Some(pixels) = width.checked_mul(height) else {
            return FrameStatus::Dropped(DropReason::Overflow);
        };
        if output.len() < pixels {
            return FrameStatus::Dropped(DropReason::PlaneTooSmall {
                plane: PlaneKind::Output,
                required: pixels,
                actual: output.len(),
            });
        }
        let output = &mut output[..pixels];

        let grid = config.grid();
        let swap = config.planar_swap;
        // One monomorphized row loop per layout keeps the pixel body free
        // of layout branches.
        match config.layout.effective() {
            ChromaLayout::Planar => self.run(output, width, grid, |x, y| {
                planes.sample_planar(swap, x, y)
            }),
            ChromaLayout::SemiPlanarAb => self.run(output, width, grid, |x, y| planes.sample_ab(x, y)),
            _ => self.run(output, width, grid, |x, y| planes.sample_ba(x, y)),
        }
        FrameStatus::Rendered
    }

    fn run<F>(&self, output: &mut [u32], width: usize, grid: Option<&ColorGrid>, sample: F)
    where
        F: Fn(usize, usize) -> [u8; 3] + Sync,
    {
        match self.options.execution {
            Execution::Sequential => output
                .chunks_exact_mut(width)
                .enumerate()
                .for_each(|(y, row)| render_row(row, y, grid, &sample)),
            Execution::Parallel => output
                .par_chunks_exact_mut(width)
                .enumerate()
                .for_each(|(y, row)| render_row(row, y, grid, &sample)),
        }
    }
}

#[inline(always)]
fn render_row<F>(row: &mut [u32], y: usize, grid: Option<&ColorGrid>, sample: &F)
where
    F: Fn(usize, usize) -> [u8; 3],
{
    for (x, out) in row.iter_mut().enumerate() {
        *out = shade(sample(x, y), grid);
    }
}

/// Convert, grade and pack one decoded sample.
#[inline(always)]
pub fn shade([y, a, b]: [u8; 3], grid: Option<&ColorGrid>) -> u32 {
    let rgb = ycbcr_to_rgb(f32::from(y), f32::from(a), f32::from(b));
    pack_pixel(lut::sample(grid, rgb))
}

/// Pack normalized RGB as `0xFF_BB_GG_RR`.
///
/// Channels are scaled by 255 and truncated, never rounded. In memory on a
/// little-endian host the bytes read R, G, B, A.
#[inline(always)]
pub fn pack_pixel([r, g, b]: [f32; 3]) -> u32 {
    let r = (r * 255.0) as u8 as u32;
    let g = (g * 255.0) as u8 as u32;
    let b = (b * 255.0) as u8 as u32;
    OPAQUE_ALPHA | (b << 16) | (g << 8) | r
}
