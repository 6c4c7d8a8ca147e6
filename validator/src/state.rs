//! `VoteLedger` and related per-round buffers, guarded by a single
//! mutex per validator instance (`spec.md` §3 "Ownership", §5
//! "Shared-resource policy").

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fedhier_crypto::signing::Identity;
use fedhier_types::share::ShareUid;
use fedhier_types::vote::VoteLedgerEntry;
use fedhier_types::{RoundId, Share};
use parking_lot::Mutex;

use crate::config::ValidatorConfig;

#[derive(Default)]
struct Ledger {
    votes: HashMap<ShareUid, VoteLedgerEntry>,
    /// Shares already forwarded to a fog node; enforces "forward
    /// exactly once" independent of how many admitting votes arrive
    /// afterward.
    forwarded: HashSet<ShareUid>,
    /// Shares whose rejection threshold was already reached;
    /// permanently dropped, never retried.
    rejected: HashSet<ShareUid>,
    /// The share payload, cached so a vote gossiped without a payload
    /// attached can still be evaluated if this validator has already
    /// seen the original.
    cached_shares: HashMap<ShareUid, Share>,
}

pub struct ValidatorState {
    pub config: ValidatorConfig,
    pub identity: Identity,
    pub http: reqwest::Client,
    round: Mutex<RoundId>,
    ledger: Mutex<Ledger>,
}

impl ValidatorState {
    pub fn new(config: ValidatorConfig, identity: Identity) -> Arc<Self> {
        Arc::new(Self {
            config,
            identity,
            http: reqwest::Client::new(),
            round: Mutex::new(RoundId::new(0)),
            ledger: Mutex::new(Ledger::default()),
        })
    }

    pub fn current_round(&self) -> RoundId {
        *self.round.lock()
    }

    pub fn advance_round(&self, round: RoundId) {
        let mut guard = self.round.lock();
        if round > *guard {
            *guard = round;
            // Per-round buffers are cleared when the round advances
            // (`spec.md` §3 "Lifecycles").
            let mut ledger = self.ledger.lock();
            *ledger = Ledger::default();
        }
    }

    pub fn cache_share(&self, share: &Share) {
        self.ledger
            .lock()
            .cached_shares
            .entry(share.share_uid.clone())
            .or_insert_with(|| share.clone());
    }

    pub fn cached_share(&self, share_uid: &ShareUid) -> Option<Share> {
        self.ledger.lock().cached_shares.get(share_uid).cloned()
    }

    pub fn has_voted(&self, share_uid: &ShareUid, validator_id: &str) -> bool {
        self.ledger
            .lock()
            .votes
            .get(share_uid)
            .is_some_and(|entry| entry.keys().any(|v| v.as_str() == validator_id))
    }

    pub fn is_terminal(&self, share_uid: &ShareUid) -> bool {
        let ledger = self.ledger.lock();
        ledger.forwarded.contains(share_uid) || ledger.rejected.contains(share_uid)
    }

    /// Records `verdict` from `validator_id` for `share_uid`, a no-op
    /// if a verdict from that validator is already recorded (enforces
    /// "at most one verdict per (share_uid, validator_id)",
    /// `spec.md` §9).
    pub fn record_vote(
        &self,
        share_uid: &ShareUid,
        validator_id: fedhier_types::ValidatorId,
        verdict: fedhier_types::vote::Verdict,
    ) -> VoteLedgerEntry {
        let mut ledger = self.ledger.lock();
        let entry = ledger.votes.entry(share_uid.clone()).or_default();
        entry.entry(validator_id).or_insert(verdict);
        entry.clone()
    }

    /// Marks `share_uid` as forwarded if it wasn't already. Returns
    /// `true` iff this call is the one that performs the forward.
    pub fn mark_forwarded_once(&self, share_uid: &ShareUid) -> bool {
        self.ledger.lock().forwarded.insert(share_uid.clone())
    }

    pub fn mark_rejected(&self, share_uid: &ShareUid) {
        self.ledger.lock().rejected.insert(share_uid.clone());
    }
}
