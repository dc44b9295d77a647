//! API server lifecycle.
//!
//! Pattern: bind → spawn background task → return handle with shutdown
//! channel. `serve` is the foreground variant used by the binary, stopping
//! on Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::config::AppConfig;
use crate::core_state::CoreState;

/// Handle to a server running in a background task.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Start the server on `addr` (port 0 picks an ephemeral port).
pub async fn start_server_on(core: Arc<CoreState>, addr: SocketAddr) -> std::io::Result<ApiServer> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = api_router(core);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Load the classifier in the background so the first X-ray request does
/// not pay for the download and session build.
pub fn warm_classifier(core: Arc<CoreState>) {
    tokio::task::spawn_blocking(move || {
        if core.classifier().is_err() {
            tracing::warn!("Serving without X-ray analysis");
        }
    });
}

/// Run the server in the foreground until Ctrl-C.
pub async fn serve(config: AppConfig) -> std::io::Result<()> {
    let bind_addr = config.bind_addr;
    let warm = config.warm_classifier;
    let core = Arc::new(CoreState::new(config));

    if warm {
        warm_classifier(core.clone());
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, api_router(core))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down");
        })
        .await
}
