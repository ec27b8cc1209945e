//! quillpost - users and articles over a small JSON HTTP API.

use quillpost::config::{self, Config};
use quillpost::http::{self, AppState};
use quillpost::{metrics, store};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let mut config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    config.apply_env();

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        server = %config.server.name,
        listen = %config.server.listen,
        backend = ?config.database.backend,
        "Starting quillpost"
    );

    // Without a store there is nothing to serve.
    let store = store::open(&config.database).await.map_err(|e| {
        error!(error = %e, "Failed to open store");
        e
    })?;

    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    match config.metrics_port() {
        None => info!("Metrics disabled"),
        Some(port) => {
            metrics::init();
            info!("Metrics initialized");

            tokio::spawn(async move {
                http::run_metrics_server(port).await;
            });
            info!(port, "Prometheus HTTP server started");
        }
    }

    let listener = match TcpListener::bind(config.server.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(address = %config.server.listen, error = %e, "Failed to bind API listener");
            store.close().await;
            return Err(e.into());
        }
    };

    let app = http::router(AppState::new(store.clone(), config.server.name.as_str()));
    let served = http::serve(listener, app, shutdown_signal()).await;

    store.close().await;
    info!("quillpost stopped");

    served?;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received, draining requests");
}
