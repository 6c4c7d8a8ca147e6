use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use facility::config::FacilityConfig;
use fedhier_net::trainer::DeterministicTrainer;
use fedhier_net::{observability, shutdown};

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    observability::install_tracing("facility=info,fedhier_net=info,fedhier_crypto=info");
    tracing::info!("starting facility node");

    let config = FacilityConfig::parse();
    let bind_addr = config.shared.bind_addr;

    // The real neural-network trainer is an external collaborator this
    // crate never implements (`spec.md` §1); the deterministic
    // trainer stands in so the pipeline is runnable end to end.
    let trainer = Arc::new(DeterministicTrainer { offset: 0.01 });

    let (router, state) = facility::build_router(config, trainer);

    let (cancellation_token, is_graceful_shutdown) =
        shutdown::spawn_shutdown_task(shutdown::default_shutdown_signal());

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, facility_id = %state.config.facility_id, "facility listening");

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
    tracing::info!("shutdown signal received, waiting for server task..");
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
