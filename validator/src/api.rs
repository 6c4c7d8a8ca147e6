use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::{get, post}};
use fedhier_net::RoundError;
use fedhier_types::dto::{HealthResponse, ReceiveVoteRequest, ValidateShareRequest};

use crate::state::ValidatorState;

pub fn routes(state: Arc<ValidatorState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/validate_share", post(validate_share))
        .route("/receive_vote", post(receive_vote))
        .with_state(state)
}

async fn health(State(state): State<Arc<ValidatorState>>) -> impl IntoResponse {
    Json(HealthResponse {
        role: "validator".to_string(),
        instance_id: state.config.validator_id.clone(),
        round: state.current_round(),
        status: "running".to_string(),
        received_global_model: false,
    })
}

async fn validate_share(
    State(state): State<Arc<ValidatorState>>,
    Json(request): Json<ValidateShareRequest>,
) -> Result<impl IntoResponse, RoundError> {
    crate::services::validate_share(state, request.share).await?;
    Ok(axum::http::StatusCode::OK)
}

async fn receive_vote(
    State(state): State<Arc<ValidatorState>>,
    Json(request): Json<ReceiveVoteRequest>,
) -> Result<impl IntoResponse, RoundError> {
    crate::services::receive_vote(state, request.vote, request.share).await?;
    Ok(axum::http::StatusCode::OK)
}
