#![forbid(unsafe_code)]

//! `star-relay` — Slack-stars-to-Asana sync daemon binary.
//!
//! Bootstraps configuration and credentials, builds the two provider
//! clients, and drives the poll loop until ctrl-c/SIGTERM.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use star_relay::asana::client::{AsanaClient, TaskTarget};
use star_relay::config::GlobalConfig;
use star_relay::engine::SyncEngine;
use star_relay::scheduler::Scheduler;
use star_relay::slack::client::SlackClient;
use star_relay::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "star-relay", about = "Slack stars to Asana tasks sync daemon", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Run a single poll cycle and exit instead of looping.
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("star-relay bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    config.load_credentials().await?;
    info!("configuration loaded");

    let source = SlackClient::new(config.slack.token.clone(), config.request_timeout())?;
    let target = TaskTarget {
        workspace: config.asana.workspace_id.clone(),
        assignee: config.asana.assignee_id.clone(),
        project: config.asana.project_id.clone(),
    };
    let sink = AsanaClient::new(config.asana.token.clone(), target, config.request_timeout())?;

    let engine = SyncEngine::new(source, sink, config.slack.team_domain.clone());
    let scheduler = Scheduler::new(engine, config.poll_interval());

    if args.once {
        return scheduler.run_once().await;
    }

    info!(
        poll_interval_seconds = config.poll_interval_seconds,
        "poll loop starting"
    );

    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let loop_handle = tokio::spawn(async move { scheduler.run(loop_cancel).await });

    shutdown_signal().await;
    info!("shutdown signal received");
    cancel.cancel();

    let _ = loop_handle.await;
    info!("star-relay shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
