//! Per-instance mutable state, guarded by a single mutex as required by
//! `spec.md` §3 ("Ownership") and §5 ("Shared-resource policy").

use std::sync::Arc;

use fedhier_crypto::signing::Identity;
use fedhier_net::LocalTrainerService;
use fedhier_types::model::WeightVector;
use fedhier_types::RoundId;
use parking_lot::Mutex;

use crate::config::FacilityConfig;

#[derive(Debug, Clone, Default)]
pub struct RegistrationState {
    pub registered: bool,
    pub issued_key_hex: Option<String>,
}

pub struct FacilityState {
    pub config: FacilityConfig,
    pub identity: Identity,
    pub trainer: LocalTrainerService,
    pub http: reqwest::Client,
    round: Mutex<RoundId>,
    registration: Mutex<RegistrationState>,
    /// The most recently unwrapped global model, cached for whatever
    /// collaborator starts the next round (`spec.md` §6 treats
    /// `/start_round`'s `previous_global_weights` as externally
    /// supplied rather than self-fed).
    last_global: Mutex<Option<WeightVector>>,
}

impl FacilityState {
    pub fn new(config: FacilityConfig, identity: Identity, trainer: LocalTrainerService) -> Arc<Self> {
        Arc::new(Self {
            config,
            identity,
            trainer,
            http: reqwest::Client::new(),
            round: Mutex::new(RoundId::new(0)),
            registration: Mutex::new(RegistrationState::default()),
            last_global: Mutex::new(None),
        })
    }

    pub fn current_round(&self) -> RoundId {
        *self.round.lock()
    }

    /// Advances the local round counter to `round`, refusing to move
    /// backward (round counters are monotonically non-decreasing,
    /// `spec.md` §8 invariant 5).
    pub fn advance_round(&self, round: RoundId) {
        let mut guard = self.round.lock();
        if round > *guard {
            *guard = round;
        }
    }

    pub fn registration(&self) -> RegistrationState {
        self.registration.lock().clone()
    }

    pub fn set_registered(&self, issued_key_hex: String) {
        let mut guard = self.registration.lock();
        guard.registered = true;
        guard.issued_key_hex = Some(issued_key_hex);
    }

    pub fn last_global(&self) -> Option<WeightVector> {
        self.last_global.lock().clone()
    }

    pub fn set_last_global(&self, weights: WeightVector) {
        *self.last_global.lock() = Some(weights);
    }
}
