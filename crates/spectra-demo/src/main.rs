//! Spectra Demo — runs raw camera frames through the pixel pipeline.
//!
//! Stands in for a camera host: registers filters, issues the same
//! control commands a UI would, processes a frame (optionally many times
//! to measure throughput) and writes the result as a PNG.

mod config;
mod raw_frame;

use anyhow::{Context, Result, bail};
use clap::Parser;
use spectra_core::{
    FilterLibrary, FrameRateCounter, FrameStatus, PackedImage, Pipeline, ProcessorOptions,
};
use tracing_subscriber::EnvFilter;

use config::DemoConfig;
use raw_frame::RawFrame;

fn main() -> Result<()> {
    let config = DemoConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level().into()),
        )
        .init();

    run(&config)
}

fn run(config: &DemoConfig) -> Result<()> {
    let library = FilterLibrary::new();
    if let Some(manifest) = &config.manifest {
        let count = library
            .load_manifest(manifest)
            .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
        tracing::info!(count, "filters loaded from manifest");
    }
    for path in &config.cubes {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .with_context(|| format!("Cannot derive a filter name from {}", path.display()))?;
        library
            .load_cube(name, path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }

    let pipeline = Pipeline::new(
        library,
        ProcessorOptions {
            execution: config.execution(),
        },
    );

    let raw = RawFrame::load(&config.input, config.width, config.height, config.layout)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;
    pipeline.set_chroma_layout(raw.layout());

    if let Some(filter) = &config.filter {
        if !pipeline.set_active_filter(filter) {
            bail!(
                "Unknown filter '{filter}' (registered: {})",
                pipeline.registry().names().join(", ")
            );
        }
    }

    let mut image = PackedImage::new(config.width as u32, config.height as u32);
    let mut counter = FrameRateCounter::new("demo");
    for _ in 0..config.repeat.max(1) {
        let mut frame = raw.frame(image.frame_output());
        if let FrameStatus::Dropped(reason) = pipeline.process(&mut frame) {
            bail!("Frame dropped: {reason}");
        }
        if let Some(fps) = counter.tick() {
            tracing::info!(fps = %format!("{fps:.1}"), "throughput");
        }
    }

    let snapshot = pipeline.snapshot();
    tracing::info!(
        width = config.width,
        height = config.height,
        layout = %snapshot.layout,
        filter = %snapshot.filter_name,
        frames = config.repeat.max(1),
        "processed"
    );

    if let Some(output) = &config.output {
        image
            .save_png(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        tracing::info!(path = %output.display(), "wrote frame");
    }
    Ok(())
}
