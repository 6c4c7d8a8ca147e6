//! `ShareBuffer`: per-facility share accumulation, guarded by a single
//! mutex per fog-node instance.

use std::collections::HashMap;
use std::sync::Arc;

use fedhier_crypto::signing::Identity;
use fedhier_types::{FacilityId, RoundId};
use parking_lot::Mutex;

use crate::config::FogNodeConfig;

#[derive(Default)]
struct Buffer {
    /// facility_id -> (share_id -> share bytes).
    shares: HashMap<FacilityId, HashMap<u32, Vec<u16>>>,
    aggregation_triggered: bool,
    collection_timer_started: bool,
}

pub struct FogNodeState {
    pub config: FogNodeConfig,
    pub identity: Identity,
    pub http: reqwest::Client,
    round: Mutex<RoundId>,
    buffer: Mutex<Buffer>,
}

impl FogNodeState {
    pub fn new(config: FogNodeConfig, identity: Identity) -> Arc<Self> {
        Arc::new(Self {
            config,
            identity,
            http: reqwest::Client::new(),
            round: Mutex::new(RoundId::new(0)),
            buffer: Mutex::new(Buffer::default()),
        })
    }

    pub fn current_round(&self) -> RoundId {
        *self.round.lock()
    }

    pub fn advance_round(&self, round: RoundId) {
        let mut guard = self.round.lock();
        if round > *guard {
            *guard = round;
            *self.buffer.lock() = Buffer::default();
        }
    }

    /// Buffers one share for `facility_id`. Returns whether this call
    /// started the round's collection window (i.e. this was the first
    /// share seen this round).
    pub fn insert_share(&self, facility_id: FacilityId, share_id: u32, bytes: Vec<u16>) -> bool {
        let mut buffer = self.buffer.lock();
        buffer
            .shares
            .entry(facility_id)
            .or_default()
            .insert(share_id, bytes);
        if buffer.collection_timer_started {
            false
        } else {
            buffer.collection_timer_started = true;
            true
        }
    }

    pub fn facility_shares_ready(&self, threshold: u32) -> usize {
        self.buffer
            .lock()
            .shares
            .values()
            .filter(|shares| shares.len() as u32 >= threshold)
            .count()
    }

    /// Sets the aggregation-triggered flag if unset. Returns `true` iff
    /// this call is the one that should run aggregation.
    pub fn try_trigger_aggregation(&self) -> bool {
        let mut buffer = self.buffer.lock();
        if buffer.aggregation_triggered {
            false
        } else {
            buffer.aggregation_triggered = true;
            true
        }
    }

    /// Snapshots all buffered shares for draining into reconstruction.
    pub fn snapshot(&self) -> HashMap<FacilityId, HashMap<u32, Vec<u16>>> {
        self.buffer.lock().shares.clone()
    }
}
