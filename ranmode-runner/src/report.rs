//! Session report -- the single record of one run's resolved outcome.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use ranmode_core::outcome::Outcome;

use crate::startup::StartupState;

/// Process exit code for a resolved outcome.
pub fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Success => 0,
        Outcome::SoftWarning { .. } => 1,
        Outcome::StartupFailure { .. } => 2,
        Outcome::RuntimeFailure { .. } => 3,
    }
}

/// Everything a reporter needs to render one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    /// Unique id of this run (UUID v4).
    pub run_id: String,
    /// Final, resolved outcome.
    pub outcome: Outcome,
    /// Where startup ended.
    pub startup_state: StartupState,
    /// Measured session window; zero when the session was skipped.
    pub session_secs: f64,
    /// All teardown findings in discovery order, including ones that did
    /// not decide the outcome.
    pub findings: Vec<Outcome>,
    /// Artifact ids returned by stopped services.
    pub artifacts: Vec<String>,
    /// Whether the artifacts should be downloaded.
    pub artifacts_requested: bool,
    /// Ran against loopback doubles; no remote service was contacted.
    pub rehearsal: bool,
}

impl SessionReport {
    /// `always_download` or a failed run.
    pub fn artifacts_wanted(always_download: bool, outcome: &Outcome) -> bool {
        always_download || !outcome.is_success()
    }

    pub fn exit_code(&self) -> i32 {
        exit_code(&self.outcome)
    }

    /// Write the report as pretty JSON.
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("failed to serialize session report: {}", e))?;
        tokio::fs::write(path, json).await.map_err(|e| {
            anyhow::anyhow!("failed to write report to '{}': {}", path.display(), e)
        })?;
        tracing::info!(path = %path.display(), "session report written");
        Ok(())
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rehearsal {
            writeln!(f, "run {} (rehearsal): {}", self.run_id, self.outcome)?;
            writeln!(f, "  mode: rehearsal, no remote service contacted")?;
        } else {
            writeln!(f, "run {}: {}", self.run_id, self.outcome)?;
        }
        writeln!(f, "  startup: {}", self.startup_state)?;
        writeln!(f, "  session: {:.1}s", self.session_secs)?;
        for finding in &self.findings {
            writeln!(f, "  finding: {finding}")?;
        }
        if self.artifacts_requested && !self.artifacts.is_empty() {
            writeln!(f, "  artifacts: {}", self.artifacts.join(", "))?;
        }
        Ok(())
    }
}
