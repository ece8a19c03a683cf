//! Frame-rate accounting for capture and render loops.

use std::time::{Duration, Instant};

/// Length of one measurement window.
const WINDOW: Duration = Duration::from_secs(1);

/// Counts frames and reports frames per second once per window.
#[derive(Debug, Clone)]
pub struct FrameRateCounter {
    tag: String,
    window_start: Instant,
    frames: u32,
}

impl FrameRateCounter {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            window_start: Instant::now(),
            frames: 0,
        }
    }

    /// Record one frame. Returns the rate when a window just closed.
    pub fn tick(&mut self) -> Option<f64> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < WINDOW {
            return None;
        }
        let fps = f64::from(self.frames) / elapsed.as_secs_f64();
        tracing::debug!(tag = %self.tag, fps, "frame rate");
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }

    /// Start a fresh window with no frames counted.
    pub fn reset(&mut self) {
        self.frames = 0;
        self.window_start = Instant::now();
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}
