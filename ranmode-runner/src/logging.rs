//! Logging initialization for ranmode-runner.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `RanmodeConfig`. Library code only emits `tracing` events; the
//! subscriber is installed here, by the binary, exactly once.
//!
//! The configured level applies to the ranmode crates only. Dependencies
//! such as the metrics exporter stay at `warn`. JSON lines carry the
//! enclosing `run` span, so every event of a run has its `run_id`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ranmode_core::config::GeneralConfig;

/// Crates whose events follow the configured level.
const OWN_CRATES: [&str; 2] = ["ranmode_core", "ranmode_runner"];

/// Filter directives for `level`: ranmode crates at `level`, the rest at `warn`.
pub fn default_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for krate in OWN_CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`.
///
/// # Formats
///
/// * `"json"` - one JSON object per line (default)
/// * `"pretty"` - human-readable multi-line output
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(false),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize pretty tracing subscriber: {}", e)
                })?;
        }
        other => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                other
            ));
        }
    }

    Ok(())
}
