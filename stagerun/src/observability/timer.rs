//! Wall-clock timing for stages and runs.

use std::time::Instant;

/// Measures how long a stage or a whole run took.
#[derive(Debug, Clone, Copy)]
pub struct SpanTimer {
    started: Instant,
}

impl SpanTimer {
    /// Starts timing now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Stops timing and returns the elapsed milliseconds.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}
