use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use launch_state::app::AppServices;
use launch_state::config::AppConfig;
use launch_state::store::{KeyValueStore, LibSqlBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // Keep the guard alive so buffered file logs flush on exit.
    let _log_guard = init_tracing(&config);

    eprintln!("🚀 Launch State v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!("   User: {}", config.user_id);
    eprintln!(
        "   Onboarding version: {} (app {})",
        config.onboarding.current_version, config.onboarding.app_version
    );
    eprintln!("   API: http://0.0.0.0:{}/api/launch\n", config.port);

    // ── Database ─────────────────────────────────────────────────────────
    let backend = LibSqlBackend::new_local(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?
        .for_user(config.user_id.clone());
    tracing::info!(user_id = backend.user_id(), "Settings store ready");
    let store: Arc<dyn KeyValueStore> = Arc::new(backend);

    // ── Services ─────────────────────────────────────────────────────────
    let services = AppServices::new(store, &config.onboarding);

    // ── HTTP ─────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Launch state server started");

    axum::serve(listener, services.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Launch state server stopped");
    Ok(())
}

/// Stderr logging, plus a daily rolling file when a log directory is set.
fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "launch-state.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .init();
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
