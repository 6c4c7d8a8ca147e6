use std::process::ExitCode;

use clap::Parser;
use fedhier_net::{observability, shutdown};
use leader::config::LeaderConfig;

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    observability::install_tracing("leader=info,fedhier_net=info,fedhier_crypto=info");
    tracing::info!("starting leader");

    let config = LeaderConfig::parse();
    let bind_addr = config.shared.bind_addr;
    let (router, state) = leader::build_router(config);

    let (cancellation_token, is_graceful_shutdown) =
        shutdown::spawn_shutdown_task(shutdown::default_shutdown_signal());

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, leader_id = %state.config.leader_id, "leader listening");

    let axum_cancel_token = cancellation_token.clone();
    let server = tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move { axum_cancel_token.cancelled().await })
            .await;
        if let Err(err) = result {
            tracing::error!(%err, "axum server error");
        }
    });

    cancellation_token.cancelled().await;
    match tokio::time::timeout(std::time::Duration::from_secs(10), server).await {
        Ok(_) => tracing::info!("server task finished"),
        Err(_) => tracing::warn!("server task did not finish in time"),
    }

    if is_graceful_shutdown.load(std::sync::atomic::Ordering::Relaxed) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
