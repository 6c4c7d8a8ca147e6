use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::{get, post}};
use fedhier_net::RoundError;
use fedhier_types::dto::HealthResponse;
use fedhier_types::model::FogPartial;

use crate::state::LeaderState;

pub fn routes(state: Arc<LeaderState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/receive_fog_aggregation", post(receive_fog_aggregation))
        .with_state(state)
}

async fn health(State(state): State<Arc<LeaderState>>) -> impl IntoResponse {
    Json(HealthResponse {
        role: "leader".to_string(),
        instance_id: state.config.leader_id.clone(),
        round: state.current_round(),
        status: "running".to_string(),
        received_global_model: false,
    })
}

async fn receive_fog_aggregation(
    State(state): State<Arc<LeaderState>>,
    body: Bytes,
) -> Result<impl IntoResponse, RoundError> {
    let partial: FogPartial = fedhier_types::wire::decode_frame(&body)
        .map_err(|err| RoundError::IntegrityFailure(err.to_string()))?;
    crate::services::receive_fog_partial(state, partial).await?;
    Ok(axum::http::StatusCode::OK)
}
