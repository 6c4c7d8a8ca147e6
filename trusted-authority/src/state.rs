//! The facility registry: the TA's only durable-for-the-run state.

use std::collections::HashMap;
use std::sync::Arc;

use fedhier_crypto::signing::Identity;
use fedhier_types::model::{FacilityRecord, FacilityStatus};
use fedhier_types::FacilityId;
use parking_lot::Mutex;

use crate::config::TaConfig;

pub struct TaState {
    pub config: TaConfig,
    pub identity: Identity,
    pub http: reqwest::Client,
    registry: Mutex<HashMap<FacilityId, FacilityRecord>>,
    /// Facilities excluded from distribution until they re-register,
    /// per `spec.md` §4.5 ("undeliverable facilities are excluded from
    /// the next round's broadcast until they re-register").
    undeliverable: Mutex<std::collections::HashSet<FacilityId>>,
}

impl TaState {
    pub fn new(config: TaConfig, identity: Identity) -> Arc<Self> {
        Arc::new(Self {
            config,
            identity,
            http: reqwest::Client::new(),
            registry: Mutex::new(HashMap::new()),
            undeliverable: Mutex::new(std::collections::HashSet::new()),
        })
    }

    pub fn insert(&self, record: FacilityRecord) {
        self.undeliverable.lock().remove(&record.facility_id);
        self.registry.lock().insert(record.facility_id.clone(), record);
    }

    pub fn get(&self, facility_id: &FacilityId) -> Option<FacilityRecord> {
        self.registry.lock().get(facility_id).cloned()
    }

    pub fn revoke(&self, facility_id: &FacilityId) -> bool {
        let mut registry = self.registry.lock();
        if let Some(record) = registry.get_mut(facility_id) {
            record.status = FacilityStatus::Revoked;
            true
        } else {
            false
        }
    }

    pub fn list(&self) -> Vec<FacilityRecord> {
        self.registry.lock().values().cloned().collect()
    }

    /// Registered, non-revoked, non-excluded facilities: the
    /// distribution candidate set before policy evaluation.
    pub fn eligible_candidates(&self) -> Vec<FacilityRecord> {
        let undeliverable = self.undeliverable.lock();
        self.registry
            .lock()
            .values()
            .filter(|record| record.status == FacilityStatus::Registered)
            .filter(|record| !undeliverable.contains(&record.facility_id))
            .cloned()
            .collect()
    }

    pub fn mark_undeliverable(&self, facility_id: FacilityId) {
        self.undeliverable.lock().insert(facility_id);
    }
}
