//! `PartialBuffer`: per-round accumulation of fog-node partials, guarded
//! by a single mutex per leader instance.

use std::collections::HashMap;
use std::sync::Arc;

use fedhier_crypto::signing::Identity;
use fedhier_types::{FogNodeId, GlobalModel, RoundId};
use parking_lot::Mutex;

use crate::config::LeaderConfig;

#[derive(Default)]
struct Buffer {
    partials: HashMap<FogNodeId, fedhier_types::model::FogPartial>,
    timer_started: bool,
    aggregation_triggered: bool,
}

pub struct LeaderState {
    pub config: LeaderConfig,
    pub identity: Identity,
    pub http: reqwest::Client,
    round: Mutex<RoundId>,
    buffer: Mutex<Buffer>,
    /// The last round's aggregation result, kept so an aborted round can
    /// rewind to it rather than broadcast a partial aggregate.
    last_good_global: Mutex<Option<GlobalModel>>,
}

impl LeaderState {
    pub fn new(config: LeaderConfig, identity: Identity) -> Arc<Self> {
        Arc::new(Self {
            config,
            identity,
            http: reqwest::Client::new(),
            round: Mutex::new(RoundId::new(0)),
            buffer: Mutex::new(Buffer::default()),
            last_good_global: Mutex::new(None),
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

    /// Buffers one fog node's partial. Returns whether this call started
    /// the round's partial-collection timer.
    pub fn insert_partial(
        &self,
        fog_node_id: FogNodeId,
        partial: fedhier_types::model::FogPartial,
    ) -> bool {
        let mut buffer = self.buffer.lock();
        buffer.partials.insert(fog_node_id, partial);
        if buffer.timer_started {
            false
        } else {
            buffer.timer_started = true;
            true
        }
    }

    pub fn partial_count(&self) -> usize {
        self.buffer.lock().partials.len()
    }

    pub fn try_trigger_aggregation(&self) -> bool {
        let mut buffer = self.buffer.lock();
        if buffer.aggregation_triggered {
            false
        } else {
            buffer.aggregation_triggered = true;
            true
        }
    }

    pub fn snapshot_partials(&self) -> Vec<fedhier_types::model::FogPartial> {
        self.buffer.lock().partials.values().cloned().collect()
    }

    pub fn last_good_global(&self) -> Option<GlobalModel> {
        self.last_good_global.lock().clone()
    }

    pub fn set_last_good_global(&self, global: GlobalModel) {
        *self.last_good_global.lock() = Some(global);
    }
}
