//! Graceful shutdown handling
//!
//! Resolves once the process is asked to stop (SIGTERM or SIGINT on unix,
//! Ctrl+C elsewhere) so the server can finish in-flight calls.

use tracing::{error, info};

/// Wait for a termination signal from the OS
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = ctrl_c() => info!("Received SIGINT"),
                }
            }
            Err(e) => {
                error!("Failed to register SIGTERM handler: {}", e);
                ctrl_c().await;
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
        info!("Received Ctrl+C");
    }

    info!("Initiating graceful shutdown...");
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
