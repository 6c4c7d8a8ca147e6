//! Admission algorithm (`spec.md` §4.2): verify, vote, gossip, forward
//! on quorum.

use std::sync::Arc;

use fedhier_crypto::signing;
use fedhier_net::retry::post_json_with_retry;
use fedhier_net::RoundError;
use fedhier_types::dto::{ReceiveShareRequest, ReceiveVoteRequest};
use fedhier_types::share::{CommitteeSignedShare, ShareMaterial};
use fedhier_types::vote::{Verdict, Vote, count_verdict};
use fedhier_types::{Share, ValidatorId};

use crate::state::ValidatorState;

/// The signed bytes for a share: its material payload plus the
/// (share_id, round) it's bound to, matching the construction at the
/// facility (`facility::services::run_round`).
fn signable_bytes(share: &Share) -> eyre::Result<Vec<u8>> {
    let ShareMaterial::ShamirReal { bytes, .. } = &share.material else {
        eyre::bail!("unknown share material variant");
    };
    let mut buf = bytes.clone();
    buf.extend_from_slice(&share.share_id.to_be_bytes());
    buf.extend_from_slice(&share.round.into_inner().to_be_bytes());
    Ok(buf)
}

fn integrity_ok(state: &ValidatorState, share: &Share) -> Result<(), String> {
    if share.threshold != state.config.shared.secret_threshold
        || share.total != state.config.shared.secret_total
    {
        return Err("threshold/total mismatch with committee config".to_string());
    }
    if !share.share_id_in_range() {
        return Err("share_id out of range".to_string());
    }
    if share.material.payload_len() == 0
        || share.material.payload_len() > state.config.shared.max_share_payload_bytes
    {
        return Err("payload size out of bounds".to_string());
    }
    Ok(())
}

/// Runs the per-share admission checks and returns the resulting
/// verdict. Does not mutate the ledger; callers record the verdict.
fn evaluate(state: &ValidatorState, share: &Share) -> Verdict {
    let Some(pubkey_hex) = state.config.known_facility_pubkey(share.facility_id.as_str()) else {
        tracing::warn!(facility_id = %share.facility_id, "unregistered facility, rejecting");
        return Verdict::Reject;
    };
    if pubkey_hex != share.issuer_pubkey {
        tracing::warn!(facility_id = %share.facility_id, "issuer pubkey mismatch, rejecting");
        return Verdict::Reject;
    }
    let Ok(bytes) = signable_bytes(share) else {
        return Verdict::Reject;
    };
    if signing::verify(&bytes, &share.signature, &share.issuer_pubkey).is_err() {
        tracing::warn!(facility_id = %share.facility_id, "signature verification failed");
        return Verdict::Reject;
    }
    if let Err(reason) = integrity_ok(state, share) {
        tracing::warn!(facility_id = %share.facility_id, %reason, "integrity check failed");
        return Verdict::Reject;
    }
    Verdict::Approve
}

/// Entry point for `/validate_share`: evaluate, cast this validator's
/// own vote, gossip it, and forward on quorum.
pub async fn validate_share(state: Arc<ValidatorState>, share: Share) -> Result<(), RoundError> {
    if share.round.is_stale(state.current_round()) {
        return Err(RoundError::StaleRound {
            request_round: share.round.into_inner(),
            current_round: state.current_round().into_inner(),
        });
    }
    state.advance_round(share.round);
    state.cache_share(&share);

    if state.has_voted(&share.share_uid, state.config.validator_id.as_str()) {
        return Ok(());
    }
    let verdict = evaluate(&state, &share);
    apply_vote(state.clone(), share, verdict).await
}

/// Entry point for `/receive_vote`: record a peer's verdict, and if
/// this validator hasn't voted on this share yet and the payload was
/// attached, evaluate and vote too.
pub async fn receive_vote(
    state: Arc<ValidatorState>,
    vote: Vote,
    share: Option<Share>,
) -> Result<(), RoundError> {
    if let Some(share) = &share {
        state.advance_round(share.round);
        state.cache_share(share);
    }
    let entry = state.record_vote(&vote.share_uid, vote.validator_id.clone(), vote.verdict);
    check_quorum(&state, &vote.share_uid, &entry).await;

    if state.has_voted(&vote.share_uid, state.config.validator_id.as_str()) {
        return Ok(());
    }
    let Some(share) = share.or_else(|| state.cached_share(&vote.share_uid)) else {
        return Ok(());
    };
    if share.round.is_stale(state.current_round()) {
        return Ok(());
    }
    let verdict = evaluate(&state, &share);
    apply_vote(state, share, verdict).await
}

async fn apply_vote(state: Arc<ValidatorState>, share: Share, verdict: Verdict) -> Result<(), RoundError> {
    let self_id: ValidatorId = state.config.validator_id.clone().into();
    let entry = state.record_vote(&share.share_uid, self_id.clone(), verdict);
    metrics::counter!(crate::metrics::METRICS_ID_VOTES_CAST).increment(1);

    gossip_vote(&state, &share, verdict).await;
    check_quorum(&state, &share.share_uid, &entry).await;
    Ok(())
}

async fn gossip_vote(state: &Arc<ValidatorState>, share: &Share, verdict: Verdict) {
    let self_id: ValidatorId = state.config.validator_id.clone().into();
    let vote = Vote {
        share_uid: share.share_uid,
        validator_id: self_id,
        verdict,
        timestamp_millis: 0,
    };
    for peer_url in &state.config.peer_validator_urls {
        let url = format!("{peer_url}/receive_vote");
        let request = ReceiveVoteRequest {
            vote: vote.clone(),
            share: Some(share.clone()),
        };
        let state = state.clone();
        let url = url.clone();
        tokio::spawn(async move {
            if post_json_with_retry(
                &state.http,
                &url,
                &request,
                state.config.shared.control_timeout,
                state.config.shared.max_retries,
                std::time::Duration::from_millis(100),
            )
            .await
            .is_ok()
            {
                metrics::counter!(crate::metrics::METRICS_ID_GOSSIP_SENT).increment(1);
            }
        });
    }
}

async fn check_quorum(
    state: &Arc<ValidatorState>,
    share_uid: &fedhier_types::share::ShareUid,
    entry: &fedhier_types::vote::VoteLedgerEntry,
) {
    if state.is_terminal(share_uid) {
        return;
    }
    let quorum = state.config.shared.quorum;
    let num_validators = state.config.shared.num_validators;
    let approvals = count_verdict(entry, Verdict::Approve) as u32;
    let rejections = count_verdict(entry, Verdict::Reject) as u32;

    if approvals >= quorum {
        if state.mark_forwarded_once(share_uid) {
            let Some(share) = state.cached_share(share_uid) else {
                tracing::error!(%share_uid, "admitted share has no cached payload, cannot forward");
                return;
            };
            forward_to_fog_node(state, share).await;
            metrics::counter!(crate::metrics::METRICS_ID_SHARES_ADMITTED).increment(1);
        }
    } else if rejections >= num_validators - quorum + 1 {
        state.mark_rejected(share_uid);
        metrics::counter!(crate::metrics::METRICS_ID_SHARES_REJECTED).increment(1);
    }
}

async fn forward_to_fog_node(state: &Arc<ValidatorState>, share: Share) {
    let fog_index = state.config.shared.fog_node_index_for_share(share.share_id) as usize;
    let Some(fog_url) = state.config.fog_node_urls.get(fog_index) else {
        tracing::error!(fog_index, "no fog node configured at this index");
        return;
    };
    let Ok(signable) = signable_bytes(&share) else {
        return;
    };
    let committee_signature = state.identity.sign(&signable);
    let signed = CommitteeSignedShare {
        share,
        committee_signature,
        committee_signer: state.identity.public_key_hex(),
    };
    let url = format!("{fog_url}/receive_share");
    let request = ReceiveShareRequest { signed_share: signed };
    if let Err(err) = post_json_with_retry(
        &state.http,
        &url,
        &request,
        state.config.shared.transfer_timeout,
        state.config.shared.max_retries,
        std::time::Duration::from_millis(200),
    )
    .await
    {
        tracing::warn!(%err, "failed to forward admitted share to fog node");
    } else {
        metrics::counter!(crate::metrics::METRICS_ID_FORWARDS).increment(1);
    }
}
