//! Signal handling for graceful shutdown.
//!
//! The server awaits [`shutdown_signal`] and stops accepting connections once
//! SIGINT or SIGTERM arrives, letting in-flight requests finish.

use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

/// Resolve when SIGINT or SIGTERM is received.
///
/// If neither handler can be registered (e.g. in restricted environments)
/// this never resolves and shutdown is left to the process being killed.
pub async fn shutdown_signal() {
    // Try to register signal handlers - may fail in containers or restricted envs
    let sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("Failed to register SIGINT handler: {}", e);
            None
        }
    };

    let sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("Failed to register SIGTERM handler: {}", e);
            None
        }
    };

    match (sigint, sigterm) {
        (Some(mut int), Some(mut term)) => {
            tokio::select! {
                _ = int.recv() => info!("Received SIGINT, initiating graceful shutdown..."),
                _ = term.recv() => info!("Received SIGTERM, initiating graceful shutdown..."),
            }
        }
        (Some(mut int), None) => {
            int.recv().await;
            info!("Received SIGINT, initiating graceful shutdown...");
        }
        (None, Some(mut term)) => {
            term.recv().await;
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
        (None, None) => {
            warn!("No signal handlers registered - graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}
