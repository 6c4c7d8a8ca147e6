//! Shared wire types for the federated-aggregation pipeline.
//!
//! This crate defines the entities from the data model (facilities,
//! shares, votes, partials, the global model) and the request/response
//! bodies each role's HTTP API exchanges. It has no behavior of its own
//! — validation, signing, and reconstruction live in `fedhier-crypto`
//! and the individual role crates.

pub mod attr;
pub mod dto;
pub mod ids;
pub mod model;
pub mod share;
pub mod vote;
pub mod wire;

pub use attr::{AttributeSet, Policy};
pub use ids::{FacilityId, FogNodeId, RoundId, ValidatorId};
pub use model::{FacilityRecord, FacilityStatus, FogPartial, GlobalModel, WeightVector};
pub use share::{Share, ShareId, ShareMaterial, ShareUid};
pub use vote::{Vote, Verdict};
