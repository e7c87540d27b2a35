//! Test configuration builder for E2E tests.
//!
//! Provides [`TestConfigBuilder`] for creating `RanmodeConfig` instances
//! and the `SessionParameters` derived from them.

use std::io::Write;
use std::path::PathBuf;

use ranmode_core::config::RanmodeConfig;
use ranmode_core::params::SessionParameters;

/// Builder for test-friendly `RanmodeConfig` instances.
///
/// Starts from the defaults with a short session so tests that do not
/// pause the clock stay fast.
#[allow(dead_code)]
pub struct TestConfigBuilder {
    config: RanmodeConfig,
}

#[allow(dead_code)]
impl TestConfigBuilder {
    pub fn new() -> Self {
        let mut config = RanmodeConfig::default();
        config.session.duration_secs = 1;
        Self { config }
    }

    pub fn antennas(mut self, n: usize) -> Self {
        self.config.session.nof_antennas = n;
        self
    }

    pub fn extra_config(mut self, extra: &str) -> Self {
        self.config.session.extra_config = extra.to_owned();
        self
    }

    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.config.session.duration_secs = secs;
        self
    }

    pub fn warning_as_errors(mut self, enabled: bool) -> Self {
        self.config.policy.warning_as_errors = enabled;
        self
    }

    pub fn fail_if_kos(mut self, enabled: bool) -> Self {
        self.config.policy.fail_if_kos = enabled;
        self
    }

    pub fn log_search(mut self, enabled: bool) -> Self {
        self.config.policy.log_search = enabled;
        self
    }

    pub fn always_download_artifacts(mut self, enabled: bool) -> Self {
        self.config.policy.always_download_artifacts = enabled;
        self
    }

    pub fn base_station_stop_secs(mut self, secs: u64) -> Self {
        self.config.timeouts.base_station_stop_secs = secs;
        self
    }

    pub fn metrics_enabled(mut self, enabled: bool) -> Self {
        self.config.metrics.enabled = enabled;
        self
    }

    pub fn build(self) -> RanmodeConfig {
        self.config
    }

    /// Build and convert into session parameters.
    pub fn params(self) -> SessionParameters {
        SessionParameters::from_config(&self.config)
    }
}

/// Write a TOML string to a temp file and return its path.
///
/// The returned `NamedTempFile` must be kept alive for the path to remain valid.
#[allow(dead_code)]
pub fn write_config_file(toml: &str) -> (tempfile::NamedTempFile, PathBuf) {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("failed to create temp config file");
    file.write_all(toml.as_bytes())
        .expect("failed to write temp config file");
    let path = file.path().to_path_buf();
    (file, path)
}

/// Serialize a config to a TOML file.
#[allow(dead_code)]
pub fn write_config(config: &RanmodeConfig) -> (tempfile::NamedTempFile, PathBuf) {
    let toml = toml::to_string(config).expect("config should serialize");
    write_config_file(&toml)
}
