//! Request/response bodies for the HTTP endpoints in `spec.md` §6.
//!
//! One struct per body that isn't already a bare entity from
//! [`crate::model`] or [`crate::share`].

use serde::{Deserialize, Serialize};

use crate::attr::AttributeSet;
use crate::ids::{FacilityId, RoundId};
use crate::model::{FacilityStatus, GlobalModel};
use crate::share::CommitteeSignedShare;
use crate::vote::Vote;

/// `GET /` health response, common shape across all five role types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub role: String,
    pub instance_id: String,
    pub round: RoundId,
    pub status: String,
    /// Facility-only: whether a `GlobalModel` has ever been unwrapped and
    /// cached locally. Always `false` for non-facility roles.
    pub received_global_model: bool,
}

/// `POST /register_facility` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterFacilityRequest {
    pub facility_id: FacilityId,
    /// Hex-encoded ed25519 public key.
    pub public_key: String,
    pub attributes: AttributeSet,
    /// The nonce the facility found such that `H(nonce || facility_id
    /// || pubkey) < 2^(256-d)`.
    pub pow_nonce: u64,
}

/// `POST /register_facility` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterFacilityResponse {
    pub status: FacilityStatus,
    /// Hex-encoded attribute key.
    pub issued_key: String,
}

/// `GET /facility_list` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityListResponse {
    pub facilities: Vec<FacilityListEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityListEntry {
    pub facility_id: FacilityId,
    pub status: FacilityStatus,
}

/// `POST /revoke_facility` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeFacilityRequest {
    pub facility_id: FacilityId,
}

/// `GET /get_public_key` response — the TA's own signing key, handed to
/// facilities so they can verify distributed globals' wrapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaPublicKeyResponse {
    pub public_key: String,
}

/// `POST /distribute_global_model` request, leader -> TA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributeGlobalModelRequest {
    pub global: GlobalModel,
}

/// `POST /receive_global_model` request, TA -> facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveGlobalModelRequest {
    pub round: RoundId,
    /// The wrapped (encrypted-under-policy) serialized `WeightVector`.
    pub encrypted_data: Vec<u8>,
    /// The policy's canonical bytes, the wrap's keying material. Not
    /// secret — it travels alongside the ciphertext so any eligible
    /// recipient can unwrap.
    pub policy_bytes: Vec<u8>,
}

/// `POST /validate_share` request, facility -> validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateShareRequest {
    pub share: crate::share::Share,
}

/// `POST /receive_vote` request, validator -> validator (gossip).
/// Carries the voting validator's verdict plus, the first time a peer
/// needs it to cast its own vote, the share payload being voted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveVoteRequest {
    pub vote: Vote,
    pub share: Option<crate::share::Share>,
}

/// `POST /receive_share` request, validator -> fog node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveShareRequest {
    pub signed_share: CommitteeSignedShare,
}

/// `POST /start_round` request, orchestrator -> facility. Carries the
/// previous round's global weights, or nothing for round 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRoundRequest {
    pub round: RoundId,
    pub previous_global_weights: Option<crate::model::WeightVector>,
}
