//! Graceful shutdown plumbing, standing in for the teacher's internal
//! `nodes_common::spawn_shutdown_task` / `default_shutdown_signal`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;

/// Resolves once the process receives SIGINT (or, on Unix, SIGTERM),
/// mirroring the teacher's `default_shutdown_signal`.
pub async fn default_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
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
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Spawns a task that cancels the returned token once `shutdown_signal`
/// resolves, and reports (via the returned flag) whether shutdown was
/// triggered by that signal rather than some other failure path.
pub fn spawn_shutdown_task(
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> (CancellationToken, Arc<AtomicBool>) {
    let token = CancellationToken::new();
    let is_graceful = Arc::new(AtomicBool::new(false));

    let task_token = token.clone();
    let task_is_graceful = is_graceful.clone();
    tokio::spawn(async move {
        shutdown_signal.await;
        tracing::info!("shutdown signal received");
        task_is_graceful.store(true, Ordering::Relaxed);
        task_token.cancel();
    });

    (token, is_graceful)
}
