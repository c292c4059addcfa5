//! Graceful shutdown

use tokio::signal;

/// Handler for graceful shutdown
///
/// Resolves on Ctrl+C or, on Unix, SIGTERM. A signal handler that can not be
/// installed never resolves, the other one still can.
pub async fn handler() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Could not listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                tracing::error!("Could not listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl+C received, starting graceful shutdown"),
        () = terminate => tracing::info!("SIGTERM received, starting graceful shutdown"),
    }
}
