use clap::Parser;
use cli::Cli;
use collector::Collector;
use config::{AnalyzerConfig, ConfigErrors};
use dsan_analysis::AnalysisError;
use dsan_ingest::IngestError;
use itertools::Itertools;
use render::RenderError;
use std::{io, process::ExitCode};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod collector;
mod config;
mod render;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod render_test;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigErrors),
    #[error("Failed to load benchmark results: {0}")]
    Ingest(#[from] IngestError),
    #[error("Failed to analyze benchmark results: {0}")]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("No benchmark result files were found in the given inputs")]
    NoInputs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("dsan: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), RunError> {
    let mut config = match cli.config {
        Some(ref path) => {
            info!("Loading config from {}", path.display());
            AnalyzerConfig::load(path)?
        }
        None => AnalyzerConfig::default(),
    };
    config.apply_cli(cli);

    if config.preflight_checks() {
        return Err(ConfigErrors::PreflightFailed.into());
    }

    let paths = Collector::load(&config.inputs)?.collect_vec();
    if paths.is_empty() {
        return Err(RunError::NoInputs);
    }
    info!(files = paths.len(), "Collected benchmark result files");

    let records = dsan_ingest::load_paths(&paths)?;
    let report = dsan_analysis::assemble(&records, &config.report_options()?)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::render(&report, config.output.format, &mut out)?;

    Ok(())
}
