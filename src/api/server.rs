use std::sync::Arc;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    services::{health, import},
    state::AppState,
};
use crate::backend::HttpArchiveBackend;
use crate::config::Config;
use crate::errorlog::{ErrorSink, FileSink, TracingSink};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Routes and middleware, without binding a socket
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/import", post(import))
        .route("/health", get(health))
        .with_state(state)
        // Transparently decompress gzip request bodies
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    info!(base_url = %config.backend.base_url, "Connecting archival backend client");
    let backend = HttpArchiveBackend::new(&config.backend)
        .map_err(|e| format!("Failed to create backend client: {}", e))?;

    let sink: Arc<dyn ErrorSink> = match &config.logging.error_log_dir {
        Some(dir) => {
            info!(path = %dir.display(), "Writing import errors to log directory");
            Arc::new(
                FileSink::open(dir)
                    .map_err(|e| format!("Failed to open error log directory: {}", e))?,
            )
        }
        None => Arc::new(TracingSink::new()),
    };

    let address = config.server.bind_addr;
    let state = AppState::new(config, Arc::new(backend), sink);
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Import proxy listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
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
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
