//! Dashboard server lifecycle: bind → spawn background task → return a
//! handle with a shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::core_state::CoreState;
use crate::web::router::app_router;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running dashboard server.
pub struct DashboardServer {
    pub addr: SocketAddr,
    pub started_at: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl DashboardServer {
    /// Signal a graceful shutdown.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Dashboard server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Dashboard server task failed: {e}");
        }
    }
}

/// Bind `bind` (port 0 picks an ephemeral port) and serve the dashboard in a
/// background task.
pub async fn start_server(
    core: Arc<CoreState>,
    bind: SocketAddr,
) -> Result<DashboardServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|source| ServerError::Bind { addr: bind, source })?;
    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = app_router(core);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Dashboard server received shutdown signal");
        };

        tracing::info!(%addr, "Dashboard server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Dashboard server error: {e}");
        }

        tracing::info!("Dashboard server stopped");
    });

    Ok(DashboardServer {
        addr,
        started_at: chrono::Utc::now().to_rfc3339(),
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_core(dir: &tempfile::TempDir) -> Arc<CoreState> {
        Arc::new(
            CoreState::new(&dir.path().join("test.db"), &dir.path().join("exports")).unwrap(),
        )
    }

    #[tokio::test]
    async fn serves_health_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = start_server(test_core(&dir), "127.0.0.1:0".parse().unwrap())
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);
        assert!(!server.started_at.is_empty());

        let mut stream = tokio::net::TcpStream::connect(server.addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("\"status\":\"ok\""));

        server.shutdown();
        server.stopped().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let core = test_core(&dir);
        let mut first = start_server(core.clone(), "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();

        let err = start_server(core, first.addr).await.err().unwrap();
        assert!(matches!(err, ServerError::Bind { .. }));

        first.shutdown();
    }
}
