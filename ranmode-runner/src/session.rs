//! Fixed-length observation window while both services run autonomously.

use std::time::Duration;

use tokio::time::Instant;

use ranmode_core::metrics as m;

/// Holds the run in the "under test" state for a fixed duration.
///
/// No polling and no remote calls happen during the window. A service that
/// dies mid-window is only noticed by teardown diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct SessionRunner {
    duration: Duration,
}

impl SessionRunner {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Configured window length.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Sleeps for the configured duration and returns the measured window.
    pub async fn run(&self) -> Duration {
        tracing::info!(duration_secs = self.duration.as_secs(), "session window open");
        metrics::gauge!(m::SESSION_ACTIVE).set(1.0);

        let opened = Instant::now();
        tokio::time::sleep(self.duration).await;
        let window = opened.elapsed();

        metrics::gauge!(m::SESSION_ACTIVE).set(0.0);
        metrics::histogram!(m::SESSION_WINDOW_SECONDS).record(window.as_secs_f64());
        tracing::info!(window_secs = window.as_secs_f64(), "session window closed");
        window
    }
}
