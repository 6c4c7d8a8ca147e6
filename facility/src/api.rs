//! HTTP surface for the facility role (`spec.md` §6): `/`, `/register`,
//! `/start_round`, `/receive_global_model`.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::{get, post}};
use fedhier_net::RoundError;
use fedhier_types::dto::{HealthResponse, ReceiveGlobalModelRequest};

use crate::state::FacilityState;

pub fn routes(state: Arc<FacilityState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/start_round", post(start_round))
        .route("/receive_global_model", post(receive_global_model))
        .with_state(state)
}

async fn health(State(state): State<Arc<FacilityState>>) -> impl IntoResponse {
    let registration = state.registration();
    Json(HealthResponse {
        role: "facility".to_string(),
        instance_id: state.config.facility_id.clone(),
        round: state.current_round(),
        status: if registration.registered {
            "registered".to_string()
        } else {
            "unregistered".to_string()
        },
        received_global_model: state.last_global().is_some(),
    })
}

async fn register(State(state): State<Arc<FacilityState>>) -> Result<impl IntoResponse, RoundError> {
    crate::services::register(&state)
        .await
        .map_err(|err| RoundError::TransientTransport(err.to_string()))?;
    Ok(axum::http::StatusCode::OK)
}

/// Accepts raw `bincode`-encoded bytes: `Option<(RoundId,
/// WeightVector)>`. Training is long-running, so this kicks off a
/// background task and responds immediately — the contract
/// (`spec.md` §4.1) returns nothing synchronously.
async fn start_round(
    State(state): State<Arc<FacilityState>>,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, RoundError> {
    let request: fedhier_types::dto::StartRoundRequest = fedhier_types::wire::decode_frame(&body)
        .map_err(|err| RoundError::IntegrityFailure(err.to_string()))?;

    if request.round.is_stale(state.current_round()) {
        return Err(RoundError::StaleRound {
            request_round: request.round.into_inner(),
            current_round: state.current_round().into_inner(),
        });
    }

    tokio::spawn(async move {
        if let Err(err) = crate::services::run_round(
            state.clone(),
            request.round,
            request.previous_global_weights,
        )
        .await
        {
            tracing::error!(%err, "round failed");
        }
    });

    Ok(axum::http::StatusCode::ACCEPTED)
}

async fn receive_global_model(
    State(state): State<Arc<FacilityState>>,
    Json(request): Json<ReceiveGlobalModelRequest>,
) -> Result<impl IntoResponse, RoundError> {
    if request.round.is_stale(state.current_round()) {
        return Err(RoundError::StaleRound {
            request_round: request.round.into_inner(),
            current_round: state.current_round().into_inner(),
        });
    }
    let unwrapped = fedhier_crypto::abe::unwrap(&request.encrypted_data, &request.policy_bytes);
    let weights: fedhier_types::model::WeightVector = bincode::deserialize(&unwrapped)
        .map_err(|err| RoundError::IntegrityFailure(err.to_string()))?;
    state.set_last_global(weights);

    metrics::counter!(crate::metrics::METRICS_ID_GLOBAL_MODELS_RECEIVED).increment(1);
    tracing::info!(round = %request.round, bytes = request.encrypted_data.len(), "received global model");
    Ok(axum::http::StatusCode::OK)
}
