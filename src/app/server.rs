//! Exposition server task with an explicit shutdown path.

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Serve `router` on `listener` until `shutdown_rx` flips to `true`.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown_rx: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(addr = %addr, "Serving metrics");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            while shutdown_rx.changed().await.is_ok() {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            info!("Metrics server shutting down");
        })
        .await
}

/// Spawn the exposition server as a tokio task.
///
/// Sending `true` on the returned sender stops the server gracefully; the
/// join handle yields the server's I/O result so a failure is never lost.
pub fn spawn_server(
    listener: TcpListener,
    router: Router,
) -> (JoinHandle<std::io::Result<()>>, watch::Sender<bool>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(serve(listener, router, shutdown_rx));
    (handle, shutdown_tx)
}
