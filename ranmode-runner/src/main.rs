use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use ranmode_core::config::RanmodeConfig;
use ranmode_core::params::SessionParameters;
use ranmode_runner::cli::RunnerCli;
use ranmode_runner::loopback::{CallJournal, LoopbackDiagnostics, LoopbackService};
use ranmode_runner::orchestrator::Orchestrator;
use ranmode_runner::{logging, metrics_server};

/// Exit code for configuration and setup errors (EX_USAGE).
const EXIT_CONFIG: u8 = 64;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = RunnerCli::parse();

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ranmode-runner: {e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if cli.validate {
        return match print_resolved(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("ranmode-runner: {e:#}");
                ExitCode::from(EXIT_CONFIG)
            }
        };
    }

    if !cli.rehearse {
        eprintln!(
            "ranmode-runner: no transport linked; pass --rehearse to run against loopback doubles"
        );
        return ExitCode::from(EXIT_CONFIG);
    }

    if let Err(e) = setup(&config) {
        eprintln!("ranmode-runner: {e:#}");
        return ExitCode::from(EXIT_CONFIG);
    }

    let code = run(&config).await;
    ExitCode::from(code)
}

/// Load the file, apply env overrides, then CLI overrides, and validate.
async fn load_config(cli: &RunnerCli) -> Result<RanmodeConfig> {
    let mut config = RanmodeConfig::load(&cli.config)
        .await
        .with_context(|| format!("failed to load config '{}'", cli.config.display()))?;

    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.general.log_format = format.clone();
    }
    if let Some(secs) = cli.duration {
        config.session.duration_secs = secs;
    }
    if let Some(path) = &cli.report {
        config.general.report_path = path.display().to_string();
    }

    config.validate().context("config validation failed")?;
    Ok(config)
}

fn print_resolved(config: &RanmodeConfig) -> Result<()> {
    let params = SessionParameters::from_config(config);
    let json = serde_json::to_string_pretty(&params).context("failed to render parameters")?;
    println!("{json}");
    Ok(())
}

fn setup(config: &RanmodeConfig) -> Result<()> {
    logging::init_tracing(&config.general)?;
    if config.metrics.enabled {
        metrics_server::install_metrics_recorder(&config.metrics)?;
    }
    Ok(())
}

async fn run(config: &RanmodeConfig) -> u8 {
    let params = SessionParameters::from_config(config);

    tracing::warn!("rehearsing against loopback doubles, no remote service is contacted");
    let journal = CallJournal::new();
    let orchestrator = Orchestrator::new(
        params,
        LoopbackService::core_network(journal.clone()),
        LoopbackService::base_station(journal.clone()),
        LoopbackDiagnostics::new(journal),
    )
    .rehearsal();

    let report = orchestrator.execute().await;
    print!("{report}");

    if !config.general.report_path.is_empty() {
        let path = std::path::Path::new(&config.general.report_path);
        if let Err(e) = report.write_json(path).await {
            tracing::error!(error = %e, "failed to write session report");
        }
    }

    u8::try_from(report.exit_code()).unwrap_or(1)
}
