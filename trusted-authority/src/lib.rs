//! The trusted authority: registers facilities via proof-of-work,
//! issues attribute keys, and wraps and distributes each round's global
//! model to policy-eligible facilities.

pub mod api;
pub mod config;
pub mod metrics;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;
use fedhier_crypto::signing::Identity;
use tower_http::trace::TraceLayer;

use crate::config::TaConfig;
use crate::state::TaState;

pub fn build_router(config: TaConfig) -> (Router, Arc<TaState>) {
    metrics::describe_metrics();
    let identity = Identity::generate();
    let state = TaState::new(config, identity);
    let router = api::routes(state.clone()).layer(TraceLayer::new_for_http());
    (router, state)
}
