//! Global aggregation (`spec.md` §4.4): sum fog-node partials layer-wise
//! and hand the result to the trusted authority.

use std::sync::Arc;

use fedhier_net::retry::post_json_with_retry;
use fedhier_net::RoundError;
use fedhier_types::dto::DistributeGlobalModelRequest;
use fedhier_types::model::{FogPartial, GlobalModel, WeightVector};
use fedhier_types::RoundId;

use crate::state::LeaderState;

pub async fn receive_fog_partial(state: Arc<LeaderState>, partial: FogPartial) -> Result<(), RoundError> {
    if partial.round.is_stale(state.current_round()) {
        return Err(RoundError::StaleRound {
            request_round: partial.round.into_inner(),
            current_round: state.current_round().into_inner(),
        });
    }
    state.advance_round(partial.round);

    let round = partial.round;
    let started_timer = state.insert_partial(partial.fog_node_id.clone(), partial);
    metrics::counter!(crate::metrics::METRICS_ID_PARTIALS_RECEIVED).increment(1);

    let expected = state.config.shared.num_fog_nodes as usize;
    if state.partial_count() >= expected {
        spawn_aggregation(state.clone(), round);
    } else if started_timer {
        let timeout = state.config.partial_timeout;
        let state = state.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            spawn_aggregation(state, round);
        });
    }
    Ok(())
}

fn spawn_aggregation(state: Arc<LeaderState>, round: RoundId) {
    if !state.try_trigger_aggregation() {
        return;
    }
    tokio::spawn(async move {
        if let Err(err) = aggregate_and_send(state, round).await {
            tracing::error!(%err, "leader aggregation failed");
        }
    });
}

async fn aggregate_and_send(state: Arc<LeaderState>, round: RoundId) -> eyre::Result<()> {
    let partials = state.snapshot_partials();
    let min_partials = state.config.min_partials();

    if (partials.len() as u32) < min_partials {
        tracing::error!(
            round = %round,
            got = partials.len(),
            needed = min_partials,
            "QuorumUnmet, rewinding to last good global model"
        );
        metrics::counter!(crate::metrics::METRICS_ID_ROUNDS_ABORTED).increment(1);
        state.advance_round(round.next());
        return Ok(());
    }

    let weights = sum_partials(&partials);
    let signable = bincode::serialize(&(round.into_inner(), &weights))?;
    let leader_signature = state.identity.sign(&signable);
    let global = GlobalModel {
        round,
        weights,
        leader_signature,
        wrapping: None,
    };

    let url = format!("{}/distribute_global_model", state.config.ta_url);
    post_json_with_retry(
        &state.http,
        &url,
        &DistributeGlobalModelRequest {
            global: global.clone(),
        },
        state.config.shared.transfer_timeout,
        state.config.shared.max_retries,
        std::time::Duration::from_millis(200),
    )
    .await
    .map_err(|err| eyre::eyre!(err))?;

    state.set_last_good_global(global);
    metrics::counter!(crate::metrics::METRICS_ID_ROUNDS_AGGREGATED).increment(1);
    state.advance_round(round.next());
    tracing::info!(round = %round, partials = partials.len(), "global model handed to trusted authority");
    Ok(())
}

/// Sums fog-node partials layer-wise. Each fog node already averaged
/// over its own facility count, so a plain sum reproduces FedAvg across
/// the whole run under the reference topology where every fog node
/// reconstructs every facility (resolved in favor of sum, not
/// divide-by-G: see the repository's design notes).
fn sum_partials(partials: &[FogPartial]) -> WeightVector {
    let mut acc = partials[0].partial_weights.clone();
    for partial in partials.iter().skip(1) {
        for (layer, other_layer) in acc.layers.iter_mut().zip(partial.partial_weights.layers.iter()) {
            for (v, ov) in layer.values.iter_mut().zip(other_layer.values.iter()) {
                *v += ov;
            }
        }
    }
    acc
}
