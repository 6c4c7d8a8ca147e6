//! The fog-node role: reconstructs each facility's Shamir shares once
//! they clear committee admission, FedAvg-aggregates the reconstructed
//! facilities assigned to this node, and forwards a partial to the
//! leader.

pub mod api;
pub mod config;
pub mod metrics;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;
use fedhier_crypto::signing::Identity;
use tower_http::trace::TraceLayer;

use crate::config::FogNodeConfig;
use crate::state::FogNodeState;

pub fn build_router(config: FogNodeConfig) -> (Router, Arc<FogNodeState>) {
    metrics::describe_metrics();
    let identity = Identity::generate();
    let state = FogNodeState::new(config, identity);
    let router = api::routes(state.clone()).layer(TraceLayer::new_for_http());
    (router, state)
}
