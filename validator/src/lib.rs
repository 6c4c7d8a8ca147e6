//! The validator role: per-share admission voting, peer gossip, and
//! exactly-once forwarding of admitted shares to fog nodes.

pub mod api;
pub mod config;
pub mod metrics;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;
use fedhier_crypto::signing::Identity;
use tower_http::trace::TraceLayer;

use crate::config::ValidatorConfig;
use crate::state::ValidatorState;

pub fn build_router(config: ValidatorConfig) -> (Router, Arc<ValidatorState>) {
    metrics::describe_metrics();
    let identity = Identity::generate();
    let state = ValidatorState::new(config, identity);
    let router = api::routes(state.clone()).layer(TraceLayer::new_for_http());
    (router, state)
}
