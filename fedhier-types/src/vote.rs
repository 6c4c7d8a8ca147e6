//! Votes and the admission ledger's value type.
//!
//! `VoteLedger` the mutex-guarded store lives in the `validator` crate
//! (per-process mutable state never crosses a process boundary); this
//! module only defines the wire shape of a vote and its map entry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::ValidatorId;
use crate::share::ShareUid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Approve,
    Reject,
}

/// A single validator's recorded verdict on a share. `timestamp` is a
/// Unix millisecond count supplied by the voting validator — used only
/// for diagnostics, never for ordering decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub share_uid: ShareUid,
    pub validator_id: ValidatorId,
    pub verdict: Verdict,
    pub timestamp_millis: u64,
}

/// `share_uid -> (validator_id -> verdict)`. At most one verdict per
/// (share_uid, validator_id) pair is the map's own invariant: entries
/// are inserted with `HashMap::entry(...).or_insert(...)`, never
/// overwritten, so a locally-cast vote and a later gossiped echo of the
/// same vote cannot both land.
pub type VoteLedgerEntry = HashMap<ValidatorId, Verdict>;

pub fn count_verdict(entry: &VoteLedgerEntry, verdict: Verdict) -> usize {
    entry.values().filter(|v| **v == verdict).count()
}
