//! Color grading transforms: the 33³ grid, its sampler and `.cube` I/O.

pub mod cube;
pub mod lut;
