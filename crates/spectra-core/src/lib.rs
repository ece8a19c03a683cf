//! Spectra Core — real-time camera pixel pipeline.
//!
//! Turns 4:2:0 luma/chroma frames into packed 32-bit pixels, optionally
//! grading them through a 33³ color grid on the way. No FFI or host
//! dependencies; hosts lend buffers through [`Frame`] and drive the
//! control plane through [`Pipeline`].

pub mod chroma;
pub mod color;
pub mod config;
pub mod error;
pub mod filters;
pub mod frame;
pub mod image;
pub mod processor;
pub mod stats;
pub mod transform;

// Re-exports for convenience.
pub use chroma::{ChromaLayout, YuvPlanes};
pub use config::{FrameConfig, Pipeline};
pub use error::{FilterError, ImageError, LutError};
pub use filters::{BYPASS_FILTER, BUILTIN_FILTERS, FilterLibrary, FilterRegistry, FilterSelection};
pub use frame::{DropReason, Frame, FrameStatus, PlaneKind, PlaneView};
pub use image::PackedImage;
pub use processor::{Execution, FrameProcessor, ProcessorOptions};
pub use stats::FrameRateCounter;
pub use transform::lut::{ColorGrid, GRID_SIZE};
