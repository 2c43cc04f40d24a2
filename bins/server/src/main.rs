//! Spendwise API Server
//!
//! Main entry point for the Spendwise backend service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spendwise_api::{AppState, create_router};
use spendwise_db::DocumentStore;
use spendwise_shared::{AppConfig, EmailService, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spendwise=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let store = match &config.store.snapshot_path {
        Some(path) => DocumentStore::open(path)
            .with_context(|| format!("Failed to open snapshot {}", path.display()))?,
        None => {
            info!("No snapshot path configured, data will not survive a restart");
            DocumentStore::new()
        }
    };
    let store = Arc::new(store);

    let jwt_service = JwtService::new(config.jwt.clone());

    let email_service = EmailService::new(config.email.clone());
    info!(
        enabled = config.email.enabled,
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let state = AppState::new(Arc::clone(&store), jwt_service, email_service);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    let snapshots = match &config.store.snapshot_path {
        Some(path) if config.store.snapshot_interval_secs > 0 => Some(spawn_snapshot_task(
            Arc::clone(&store),
            path.clone(),
            Duration::from_secs(config.store.snapshot_interval_secs),
        )),
        _ => None,
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = snapshots {
        handle.abort();
        let _ = handle.await;
    }

    if let Some(path) = &config.store.snapshot_path {
        store
            .save_snapshot(path)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    }

    info!("Server stopped");
    Ok(())
}

/// Writes a snapshot every `every` until aborted. Failures are logged and retried next tick.
fn spawn_snapshot_task(store: Arc<DocumentStore>, path: PathBuf, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = store.save_snapshot(&path) {
                error!(error = %e, path = %path.display(), "Periodic snapshot failed");
            }
        }
    })
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}
