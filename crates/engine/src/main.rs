//! ZooHunt Engine - Main entry point.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zoohunt_engine::infrastructure::{
    config::{AppConfig, StoreBackend},
    memory::InMemoryGameRepo,
    notifier::TracingNotifier,
    ports::GameRepo,
    sqlite::SqliteGameRepo,
};
use zoohunt_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zoohunt_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ZooHunt Engine");

    let config = AppConfig::from_env()?;
    tracing::info!(
        backend = ?config.store_backend,
        max_concurrency = config.autohunt.max_concurrency,
        interval_secs = config.autohunt.interval.as_secs(),
        "Configuration loaded"
    );

    let repo: Arc<dyn GameRepo> = match config.store_backend {
        StoreBackend::Sqlite => {
            if let Some(parent) = std::path::Path::new(&config.sqlite_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create data directory {}", parent.display())
                    })?;
                }
            }
            tracing::info!(path = %config.sqlite_path, "Opening SQLite store");
            Arc::new(SqliteGameRepo::new(&config.sqlite_path).await?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, state is lost on exit");
            Arc::new(InMemoryGameRepo::new())
        }
    };

    let app = App::new(repo, Arc::new(TracingNotifier::new()), config.autohunt.clone());

    app.use_cases
        .autohunt
        .restore()
        .await
        .context("failed to restore autohunt players")?;

    let cancel_token = CancellationToken::new();
    let scheduler = app.use_cases.autohunt.clone().spawn(cancel_token.clone());

    shutdown_signal().await;
    cancel_token.cancel();

    // In-flight hunts finish before the scheduler task returns
    match tokio::time::timeout(Duration::from_secs(10), scheduler).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Autohunt scheduler task failed"),
        Err(_) => tracing::warn!("Timed out waiting for autohunt scheduler to stop"),
    }

    tracing::info!("ZooHunt Engine stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
