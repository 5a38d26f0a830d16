//! # lumend: lumen daemon
//!
//! Composition root that wires the adapters together and starts the
//! refresh schedule.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Register the available source and automation plugins
//! - Connect to the keyboard and show the standby preset
//! - Ask the user which plugins to run
//! - Start the scheduler on its own task and wait for it (or Ctrl-C)
//!
//! ## Exit codes
//! `0` on Ctrl-C, `1` for a bad selection or plugin contract, `2` for a
//! configuration error, `3` when the keyboard cannot be reached.
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod selection;

use std::process::ExitCode;

use lumen_adapter_aqi::AqiSource;
use lumen_adapter_duty_timer::DutyTimerAutomation;
use lumen_adapter_virtual::VirtualConnector;
use lumen_app::orchestrator::Orchestrator;
use lumen_app::registry::PluginRegistry;
use lumen_app::scheduler::Scheduler;
use lumen_domain::error::{ConfigError, LumenError};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::selection::SelectionError;

/// Why the daemon stopped.
#[derive(Debug, thiserror::Error)]
enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lumen(#[from] LumenError),

    #[error("plugin selection failed")]
    Selection(#[from] SelectionError),

    #[error("task failed")]
    Join(#[from] tokio::task::JoinError),
}

impl DaemonError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Lumen(LumenError::Config(_)) => 2,
            Self::Lumen(LumenError::ReconnectExhausted { .. }) => 3,
            _ => 1,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("lumend: {}", report(&err));
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %report(&err), "lumend stopped");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(config: Config) -> Result<(), DaemonError> {
    let registry = registry();

    let address = config.device_address()?;
    tracing::info!(%address, "using simulated keyboard");
    let mut orchestrator = Orchestrator::new(
        VirtualConnector::new(address),
        config.orchestrator_config()?,
    );
    orchestrator.connect().await?;

    let sources = registry.source_names();
    let automations = registry.automation_names();
    let selection = tokio::task::spawn_blocking(move || {
        let mut input = std::io::stdin().lock();
        let mut output = std::io::stdout().lock();
        selection::prompt(&mut input, &mut output, &sources, &automations)
    })
    .await??;

    tracing::info!(plugin = selection.source, "source selected");
    let source = registry.build_source(selection.source, &config)?;
    let automation = selection
        .automation
        .map(|name| registry.build_automation(name, &config))
        .transpose()?;

    let scheduler =
        Scheduler::new(orchestrator, source, automation).map_err(LumenError::from)?;
    let handle = scheduler.spawn();

    tokio::select! {
        result = handle => Ok(result??),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
            Ok(())
        }
    }
}

/// The plugins offered in the selection prompt, in display order.
fn registry() -> PluginRegistry<Config> {
    let mut registry = PluginRegistry::new();
    registry
        .register_source(lumen_adapter_aqi::NAME, |config: &Config| {
            AqiSource::from_config(&config.plugins.aqi)
        })
        .register_automation(lumen_adapter_duty_timer::NAME, |config: &Config| {
            Ok(DutyTimerAutomation::from_config(&config.plugins.duty_timer))
        });
    registry
}

/// Render an error with its chain of causes.
fn report(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
