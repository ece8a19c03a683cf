//! Color conversion from camera luma/chroma samples to normalized RGB.

pub mod ycbcr;

pub use ycbcr::ycbcr_to_rgb;
