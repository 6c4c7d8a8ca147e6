//! The facility role: local training, differential privacy, Shamir
//! splitting, and per-share signed delivery to the validator committee.
//!
//! Mirrors `oprf-service`'s module split (`config`, `api`, `metrics`,
//! plus a builder in the crate root) at a smaller scale appropriate to
//! a single-role binary rather than a library embedded by many
//! consumers.

pub mod api;
pub mod config;
pub mod metrics;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::Router;
use fedhier_crypto::signing::Identity;
use fedhier_net::LocalTrainerService;
use tower_http::trace::TraceLayer;

use crate::config::FacilityConfig;
use crate::state::FacilityState;

/// Assembles the facility's axum router. Grounded on
/// `OprfServiceBuilder::build`'s `TraceLayer`-wrapped router
/// composition.
pub fn build_router(config: FacilityConfig, trainer: LocalTrainerService) -> (Router, Arc<FacilityState>) {
    build_router_with_identity(config, trainer, Identity::generate())
}

/// As [`build_router`], but with a caller-supplied identity. Lets a test
/// harness learn a facility's public key before any other role is wired
/// up (e.g. to seed a validator's known-facility list ahead of time).
pub fn build_router_with_identity(
    config: FacilityConfig,
    trainer: LocalTrainerService,
    identity: Identity,
) -> (Router, Arc<FacilityState>) {
    metrics::describe_metrics();
    let state = FacilityState::new(config, identity, trainer);
    let router = api::routes(state.clone()).layer(TraceLayer::new_for_http());
    (router, state)
}
