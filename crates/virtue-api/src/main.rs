//! # virtue-api — Binary Entry Point
//!
//! Parses configuration, initializes tracing, seeds the store, and serves
//! the Axum application until Ctrl-C.

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use virtue_api::state::{AppConfig, AppState, SecretString};
use virtue_state::seed;

/// VirtueVerse HTTP backend.
#[derive(Parser, Debug)]
#[command(name = "virtue-api", version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "VIRTUE_PORT", default_value_t = 8080)]
    port: u16,

    /// Bearer token required on /api/admin/*. Admin routes are open when unset.
    #[arg(long, env = "VIRTUE_ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,

    /// Start with no demo users or deeds (the catalog is still loaded).
    #[arg(long, env = "VIRTUE_NO_SEED")]
    no_seed: bool,

    /// Log output format.
    #[arg(long, env = "VIRTUE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// `VIRTUE_METRICS_ENABLED`; anything other than `false` keeps metrics on.
fn metrics_enabled() -> bool {
    std::env::var("VIRTUE_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let config = AppConfig {
        port: args.port,
        admin_token: args.admin_token.map(SecretString::new),
        metrics_enabled: metrics_enabled(),
    };
    if config.admin_token.is_none() {
        tracing::warn!("VIRTUE_ADMIN_TOKEN not set; admin routes are unauthenticated");
    }
    tracing::debug!(?config, "configuration loaded");

    let state = AppState::with_config(config);
    if args.no_seed {
        state.store.install_catalog(seed::catalog());
        tracing::info!("demo data disabled; catalog loaded");
    } else {
        state.seed().context("seeding demo data")?;
    }

    let app = virtue_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("VirtueVerse API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}
