use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::{get, post}};
use fedhier_net::RoundError;
use fedhier_types::dto::{
    DistributeGlobalModelRequest, FacilityListEntry, FacilityListResponse, HealthResponse,
    RegisterFacilityRequest, RevokeFacilityRequest, TaPublicKeyResponse,
};

use crate::state::TaState;

pub fn routes(state: Arc<TaState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/register_facility", post(register_facility))
        .route("/distribute_global_model", post(distribute_global_model))
        .route("/revoke_facility", post(revoke_facility))
        .route("/facility_list", get(facility_list))
        .route("/get_public_key", get(get_public_key))
        .with_state(state)
}

async fn health(State(state): State<Arc<TaState>>) -> impl IntoResponse {
    Json(HealthResponse {
        role: "trusted-authority".to_string(),
        instance_id: state.config.ta_id.clone(),
        round: fedhier_types::RoundId::new(0),
        status: "running".to_string(),
        received_global_model: false,
    })
}

async fn register_facility(
    State(state): State<Arc<TaState>>,
    Json(request): Json<RegisterFacilityRequest>,
) -> Result<impl IntoResponse, RoundError> {
    let response = crate::services::register_facility(state, request).await?;
    Ok(Json(response))
}

async fn distribute_global_model(
    State(state): State<Arc<TaState>>,
    Json(request): Json<DistributeGlobalModelRequest>,
) -> impl IntoResponse {
    tokio::spawn(async move {
        if let Err(err) = crate::services::distribute_global_model(state, request.global).await {
            tracing::error!(%err, "distribution failed");
        }
    });
    axum::http::StatusCode::ACCEPTED
}

async fn revoke_facility(
    State(state): State<Arc<TaState>>,
    Json(request): Json<RevokeFacilityRequest>,
) -> impl IntoResponse {
    if crate::services::revoke_facility(&state, &request.facility_id) {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::NOT_FOUND
    }
}

async fn facility_list(State(state): State<Arc<TaState>>) -> impl IntoResponse {
    let facilities = state
        .list()
        .into_iter()
        .map(|record| FacilityListEntry {
            facility_id: record.facility_id,
            status: record.status,
        })
        .collect();
    Json(FacilityListResponse { facilities })
}

async fn get_public_key(State(state): State<Arc<TaState>>) -> impl IntoResponse {
    Json(TaPublicKeyResponse {
        public_key: state.identity.public_key_hex(),
    })
}
