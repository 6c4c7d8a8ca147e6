//! The leader role: sums fog-node partials into the round's global
//! model and hands it to the trusted authority for wrapping and
//! distribution.

pub mod api;
pub mod config;
pub mod metrics;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;
use fedhier_crypto::signing::Identity;
use tower_http::trace::TraceLayer;

use crate::config::LeaderConfig;
use crate::state::LeaderState;

pub fn build_router(config: LeaderConfig) -> (Router, Arc<LeaderState>) {
    metrics::describe_metrics();
    let identity = Identity::generate();
    let state = LeaderState::new(config, identity);
    let router = api::routes(state.clone()).layer(TraceLayer::new_for_http());
    (router, state)
}
