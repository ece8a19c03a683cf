//! Command-line configuration for the demo.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use spectra_core::Execution;

/// Default number of passes over the input frame.
const DEFAULT_REPEAT: &str = "1";

/// Raw frame formats the demo can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RawFormat {
    /// Luma, then interleaved V/U.
    Nv21,
    /// Luma, then interleaved U/V.
    Nv12,
    /// Luma, then a full U plane, then a full V plane.
    I420,
}

/// Run one raw 4:2:0 frame through the pixel pipeline.
#[derive(Debug, Parser)]
#[command(name = "spectra-demo", version)]
#[command(long_about = "
Converts a raw 4:2:0 camera frame to packed RGBA, optionally graded
through a 33-point .cube filter, and writes the result as a PNG.

Examples:
  spectra-demo frame.nv21 -W 640 -H 480 -o frame.png
  spectra-demo frame.yuv -W 640 -H 480 --layout i420 --cube Waves.cube --filter Waves
  spectra-demo frame.nv21 -W 1920 -H 1080 --manifest filters.json --filter Waves --repeat 300 --parallel
")]
pub struct DemoConfig {
    /// Raw frame file.
    pub input: PathBuf,

    /// Frame width in pixels.
    #[arg(short = 'W', long)]
    pub width: usize,

    /// Frame height in pixels.
    #[arg(short = 'H', long)]
    pub height: usize,

    /// Byte layout of the input file.
    #[arg(short, long, value_enum, env = "SPECTRA_LAYOUT", default_value = "nv21")]
    pub layout: RawFormat,

    /// Filter to activate; `None` bypasses grading.
    #[arg(short, long, env = "SPECTRA_FILTER")]
    pub filter: Option<String>,

    /// `.cube` file to register under its file stem. Repeatable.
    #[arg(long = "cube")]
    pub cubes: Vec<PathBuf>,

    /// JSON filter manifest to load.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// PNG to write the last processed frame to.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Process the frame this many times, reporting the frame rate.
    #[arg(short, long, default_value = DEFAULT_REPEAT)]
    pub repeat: u32,

    /// Spread rows across the rayon thread pool.
    #[arg(long)]
    pub parallel: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

impl DemoConfig {
    pub fn execution(&self) -> Execution {
        if self.parallel {
            Execution::Parallel
        } else {
            Execution::Sequential
        }
    }

    /// Default log filter when RUST_LOG is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
