use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use todo_server::{settings::StoreBackend, telemetry, AppState, Settings};

#[derive(Debug, Parser)]
#[command(name = "todo-server", version, about = "Todo CRUD service backed by a Redis hash")]
struct Cli {
    /// Path to a TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overriding server.host and server.port.
    #[arg(long)]
    bind: Option<String>,

    /// Keep todos in process memory instead of Redis.
    #[arg(long)]
    memory: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if cli.memory {
        settings.store.backend = StoreBackend::Memory;
    }
    telemetry::init(&settings.log)?;

    let state = AppState::from_settings(&settings)
        .await
        .context("connecting to the todo store")?;
    if settings.store.seed_sample {
        if let Err(e) = state.seed_sample().await {
            tracing::error!(error = %e, "failed to write sample todo");
        }
    }

    let addr = cli.bind.unwrap_or_else(|| settings.bind_addr());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, backend = ?settings.store.backend, "server started");

    todo_server::run_until(listener, state, shutdown_signal()).await?;
    Ok(())
}
