//! Graceful shutdown coordination.

use tokio::sync::watch;
use tracing::info;

/// Broadcasts a shutdown signal to interested tasks (e.g. cleanup hooks).
#[derive(Clone)]
pub struct ShutdownCoordinator {
    tx: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, rx)
    }

    /// Signal all subscribers that shutdown has started.
    pub fn signal(&self) {
        let _ = self.tx.send(true);
    }

    /// Wait until the shutdown signal fires.
    pub async fn wait_for_signal(&self) {
        let mut rx = self.tx.subscribe();
        if *rx.borrow() {
            return;
        }
        // Sender dropped also means shutdown
        let _ = rx.changed().await;
    }
}

/// Resolves when SIGINT (Ctrl+C) or SIGTERM is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Waits for an OS shutdown signal, then notifies the coordinator.
///
/// Pass this to `axum::serve(...).with_graceful_shutdown(...)` so that
/// cleanup tasks waiting on the coordinator run once the server stops
/// accepting connections.
pub async fn coordinated_shutdown(coordinator: ShutdownCoordinator) {
    shutdown_signal().await;
    coordinator.signal();
}
