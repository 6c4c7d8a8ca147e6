//! Reconstruction and averaging (`spec.md` §4.3).

use std::io::Read;
use std::sync::Arc;

use fedhier_crypto::shamir;
use fedhier_net::retry::post_bytes_with_retry;
use fedhier_net::RoundError;
use fedhier_types::share::{CommitteeSignedShare, ShareMaterial};
use fedhier_types::{FogPartial, RoundId};
use flate2::read::ZlibDecoder;

use crate::state::FogNodeState;

pub async fn receive_share(
    state: Arc<FogNodeState>,
    signed: CommitteeSignedShare,
) -> Result<(), RoundError> {
    let share = &signed.share;
    if share.round.is_stale(state.current_round()) {
        return Err(RoundError::StaleRound {
            request_round: share.round.into_inner(),
            current_round: state.current_round().into_inner(),
        });
    }
    state.advance_round(share.round);

    let ShareMaterial::ShamirReal { bytes, .. } = &share.material else {
        return Err(RoundError::IntegrityFailure(
            "fog node only accepts ShamirReal shares".to_string(),
        ));
    };
    let per_byte_shares: Vec<u16> = bincode::deserialize(bytes)
        .map_err(|err| RoundError::IntegrityFailure(err.to_string()))?;

    let started_window = state.insert_share(share.facility_id.clone(), share.share_id, per_byte_shares);
    metrics::counter!(crate::metrics::METRICS_ID_SHARES_RECEIVED).increment(1);

    let threshold = state.config.shared.secret_threshold;
    let expected = state.config.expected_facilities.len();
    let ready = state.facility_shares_ready(threshold);

    if ready >= expected && expected > 0 {
        spawn_aggregation(state.clone(), share.round);
    } else if started_window {
        let round = share.round;
        let window = state.config.collection_window;
        let state = state.clone();
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            spawn_aggregation(state, round);
        });
    }
    Ok(())
}

fn spawn_aggregation(state: Arc<FogNodeState>, round: RoundId) {
    if !state.try_trigger_aggregation() {
        return;
    }
    tokio::spawn(async move {
        if let Err(err) = aggregate_and_send(state, round).await {
            tracing::error!(%err, "fog node aggregation failed");
        }
    });
}

/// Lagrange-reconstructs every facility's buffered shares and decodes
/// each result back into a `WeightVector`. Pure CPU work (no I/O), run
/// off the async executor via `spawn_blocking`.
fn reconstruct_facilities(
    snapshot: std::collections::HashMap<fedhier_types::FacilityId, std::collections::HashMap<u32, Vec<u16>>>,
    threshold: u32,
) -> Vec<fedhier_types::model::WeightVector> {
    let mut reconstructed_layers = Vec::new();
    for (facility_id, shares) in snapshot {
        if shares.len() < threshold as usize {
            tracing::warn!(%facility_id, got = shares.len(), threshold, "ReconstructionFailure, skipping facility");
            metrics::counter!(crate::metrics::METRICS_ID_FACILITIES_SKIPPED).increment(1);
            continue;
        }
        let ordered: Vec<(u32, Vec<u16>)> = shares.into_iter().collect();
        match shamir::reconstruct(&ordered, threshold) {
            Ok(compressed) => match decompress(&compressed).and_then(|bytes| {
                bincode::deserialize::<fedhier_types::model::WeightVector>(&bytes)
                    .map_err(|e| eyre::eyre!(e))
            }) {
                Ok(weights) => {
                    reconstructed_layers.push(weights);
                    metrics::counter!(crate::metrics::METRICS_ID_FACILITIES_RECONSTRUCTED).increment(1);
                }
                Err(err) => {
                    tracing::warn!(%facility_id, %err, "failed to decode reconstructed weights, skipping");
                    metrics::counter!(crate::metrics::METRICS_ID_FACILITIES_SKIPPED).increment(1);
                }
            },
            Err(err) => {
                tracing::warn!(%facility_id, %err, "Lagrange reconstruction failed, skipping");
                metrics::counter!(crate::metrics::METRICS_ID_FACILITIES_SKIPPED).increment(1);
            }
        }
    }
    reconstructed_layers
}

async fn aggregate_and_send(state: Arc<FogNodeState>, round: RoundId) -> Result<(), RoundError> {
    let threshold = state.config.shared.secret_threshold;
    let snapshot = state.snapshot();

    let reconstructed_layers = tokio::task::spawn_blocking(move || reconstruct_facilities(snapshot, threshold))
        .await
        .map_err(|err| RoundError::Fatal(format!("reconstruction task panicked: {err}")))?;

    if reconstructed_layers.is_empty() {
        state.advance_round(round.next());
        return Err(RoundError::Fatal(format!(
            "no facility reconstructed any shares in round {round}"
        )));
    }

    let facility_count = reconstructed_layers.len() as u32;
    let partial_weights = fedavg(reconstructed_layers, facility_count);

    let signable = bincode::serialize(&(round.into_inner(), &partial_weights, facility_count))
        .map_err(|err| RoundError::Fatal(err.to_string()))?;
    let signature = state.identity.sign(&signable);
    let partial = FogPartial {
        fog_node_id: state.config.fog_node_id.clone().into(),
        partial_weights,
        facility_count,
        round,
        signature,
    };

    let url = format!("{}/receive_fog_aggregation", state.config.leader_url);
    let body = fedhier_types::wire::encode_frame(&partial).map_err(|err| RoundError::Fatal(err.to_string()))?;
    post_bytes_with_retry(
        &state.http,
        &url,
        body,
        state.config.shared.transfer_timeout,
        state.config.shared.max_retries,
        std::time::Duration::from_millis(200),
    )
    .await?;
    metrics::counter!(crate::metrics::METRICS_ID_PARTIALS_SENT).increment(1);

    state.advance_round(round.next());
    tracing::info!(round = %round, facility_count, "fog partial sent to leader");
    Ok(())
}

/// Elementwise mean of `vectors` (FedAvg with uniform weighting, fixed
/// per `spec.md` §4.3 step 2).
fn fedavg(
    vectors: Vec<fedhier_types::model::WeightVector>,
    count: u32,
) -> fedhier_types::model::WeightVector {
    let mut acc = vectors[0].clone();
    for other in vectors.iter().skip(1) {
        for (layer, other_layer) in acc.layers.iter_mut().zip(other.layers.iter()) {
            for (v, ov) in layer.values.iter_mut().zip(other_layer.values.iter()) {
                *v += ov;
            }
        }
    }
    for layer in acc.layers.iter_mut() {
        for v in layer.values.iter_mut() {
            *v /= count as f32;
        }
    }
    acc
}

fn decompress(data: &[u8]) -> eyre::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
