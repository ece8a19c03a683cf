//! Active pipeline configuration and the control plane that changes it.
//!
//! [`FrameConfig`] is an immutable snapshot: chroma layout, planar swap flag
//! and the active grid. [`Pipeline`] holds the current snapshot behind an
//! `Arc`; control commands build a new snapshot and swap it in, and each
//! frame clones the `Arc` once before touching any pixel. A command issued
//! mid-frame therefore takes effect on the next frame, never halfway
//! through one.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::chroma::ChromaLayout;
use crate::filters::{BYPASS_FILTER, FilterLibrary, FilterRegistry, FilterSelection};
use crate::frame::{Frame, FrameStatus};
use crate::processor::{FrameProcessor, ProcessorOptions};
use crate::transform::lut::ColorGrid;

/// Everything a frame needs besides its pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// How chroma is laid out in the incoming planes.
    pub layout: ChromaLayout,
    /// Exchange chroma-a and chroma-b after lookup. Planar layout only.
    pub planar_swap: bool,
    /// Name the active filter was selected under.
    pub filter_name: String,
    /// Active grid, or bypass.
    #[serde(skip)]
    pub filter: FilterSelection,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self::new(ChromaLayout::Unknown)
    }
}

impl FrameConfig {
    /// A bypass configuration for `layout`.
    pub fn new(layout: ChromaLayout) -> Self {
        Self {
            layout,
            planar_swap: false,
            filter_name: BYPASS_FILTER.to_string(),
            filter: FilterSelection::Bypass,
        }
    }

    /// Same configuration grading through `grid`.
    pub fn with_grid(self, name: impl Into<String>, grid: Arc<ColorGrid>) -> Self {
        Self {
            filter_name: name.into(),
            filter: FilterSelection::Grid(grid),
            ..self
        }
    }

    /// Same configuration with the planar swap flag set to `swap`.
    pub fn with_planar_swap(self, swap: bool) -> Self {
        Self {
            planar_swap: swap,
            ..self
        }
    }

    /// The grid to sample, if any.
    pub fn grid(&self) -> Option<&ColorGrid> {
        self.filter.grid()
    }
}

/// Process-wide pipeline: configuration, filter registry and processor.
///
/// Safe to share between a control thread issuing commands and a capture
/// thread calling [`Pipeline::process`].
pub struct Pipeline<R: FilterRegistry = FilterLibrary> {
    registry: R,
    processor: FrameProcessor,
    config: RwLock<Arc<FrameConfig>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(FilterLibrary::new(), ProcessorOptions::default())
    }
}

impl<R: FilterRegistry> Pipeline<R> {
    pub fn new(registry: R, options: ProcessorOptions) -> Self {
        Self {
            registry,
            processor: FrameProcessor::new(options),
            config: RwLock::new(Arc::new(FrameConfig::default())),
        }
    }

    /// The registry filter names are resolved against.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The configuration the next frame will use.
    pub fn snapshot(&self) -> Arc<FrameConfig> {
        Arc::clone(&self.config.read())
    }

    /// Select the chroma layout. Always clears the planar swap flag.
    pub fn set_chroma_layout(&self, layout: ChromaLayout) {
        self.update(|config| {
            config.layout = layout;
            config.planar_swap = false;
        });
        tracing::info!(%layout, "chroma layout set");
    }

    /// Request (or cancel) the planar chroma swap until the next layout change.
    pub fn set_planar_swap(&self, swap: bool) {
        self.update(|config| config.planar_swap = swap);
        tracing::info!(swap, "planar chroma swap set");
    }

    /// Activate the filter registered under `name`.
    ///
    /// Returns `false` and keeps the current filter when the name does not
    /// resolve.
    pub fn set_active_filter(&self, name: &str) -> bool {
        let Some(selection) = self.registry.resolve(name) else {
            tracing::warn!(filter = name, "unknown filter, keeping current one");
            return false;
        };
        self.update(|config| {
            config.filter_name = name.to_string();
            config.filter = selection;
        });
        tracing::info!(filter = name, "active filter set");
        true
    }

    /// Process one frame with the configuration current at call time.
    pub fn process(&self, frame: &mut Frame<'_>) -> FrameStatus {
        let config = self.snapshot();
        self.processor.process(frame, &config)
    }

    fn update(&self, edit: impl FnOnce(&mut FrameConfig)) {
        let mut current = self.config.write();
        let mut next = FrameConfig::clone(&current);
        edit(&mut next);
        *current = Arc::new(next);
    }
}
