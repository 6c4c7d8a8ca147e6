use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::{get, post}};
use fedhier_net::RoundError;
use fedhier_types::dto::{HealthResponse, ReceiveShareRequest};

use crate::state::FogNodeState;

pub fn routes(state: Arc<FogNodeState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/receive_share", post(receive_share))
        .with_state(state)
}

async fn health(State(state): State<Arc<FogNodeState>>) -> impl IntoResponse {
    Json(HealthResponse {
        role: "fog-node".to_string(),
        instance_id: state.config.fog_node_id.clone(),
        round: state.current_round(),
        status: "running".to_string(),
        received_global_model: false,
    })
}

async fn receive_share(
    State(state): State<Arc<FogNodeState>>,
    Json(request): Json<ReceiveShareRequest>,
) -> Result<impl IntoResponse, RoundError> {
    crate::services::receive_share(state, request.signed_share).await?;
    Ok(axum::http::StatusCode::OK)
}
