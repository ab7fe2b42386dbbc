use actix_web::dev::ServerHandle;
use tokio::signal;
use tracing::{info, warn};

/// Wait for Ctrl+C (or SIGTERM on unix), then stop the server gracefully.
///
/// In-flight requests are allowed to finish; nothing is persisted, so the
/// in-memory link table is simply dropped.
pub async fn listen_for_shutdown(handle: ServerHandle) {
    let signal_name = match wait_for_signal().await {
        Ok(name) => name,
        Err(e) => {
            // 无法监听信号时保持服务运行，由外部终止进程
            warn!("Failed to listen for shutdown signals, graceful shutdown disabled: {}", e);
            return;
        }
    };

    info!("{} received, stopping server...", signal_name);
    handle.stop(true).await;
    info!("Server stopped");
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    // docker stop / systemd 发送的是 SIGTERM
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = signal::ctrl_c() => result.map(|()| "Ctrl+C"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    signal::ctrl_c().await.map(|()| "Ctrl+C")
}
