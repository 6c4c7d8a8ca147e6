//! The facility's per-round algorithm (`spec.md` §4.1) and registration
//! flow.

use std::io::Write;
use std::sync::Arc;

use fedhier_crypto::{dp, pow, shamir};
use fedhier_net::retry::post_json_with_retry;
use fedhier_types::dto::{RegisterFacilityRequest, RegisterFacilityResponse, ValidateShareRequest};
use fedhier_types::{AttributeSet, RoundId, Share, ShareMaterial};
use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::state::FacilityState;

/// Solves the registration proof-of-work and POSTs to the TA, storing
/// the issued attribute key on success.
pub async fn register(state: &Arc<FacilityState>) -> eyre::Result<()> {
    let pubkey_hex = state.identity.public_key_hex();
    let nonce = pow::solve(
        &state.config.facility_id,
        &pubkey_hex,
        state.config.shared.pow_difficulty,
        10_000_000,
    )
    .ok_or_else(|| eyre::eyre!("could not solve proof-of-work within iteration budget"))?;

    let request = RegisterFacilityRequest {
        facility_id: state.config.facility_id.clone().into(),
        public_key: pubkey_hex,
        attributes: AttributeSet::default(),
        pow_nonce: nonce,
    };
    let url = format!("{}/register_facility", state.config.ta_url);
    let response = post_json_with_retry(
        &state.http,
        &url,
        &request,
        state.config.shared.control_timeout,
        state.config.shared.max_retries,
        std::time::Duration::from_millis(200),
    )
    .await?;
    let body: RegisterFacilityResponse = response.json().await?;
    state.set_registered(body.issued_key);
    tracing::info!(facility_id = %state.config.facility_id, "registered with trusted authority");
    Ok(())
}

/// Runs one full training round: invoke the local trainer, apply DP,
/// compress, split into shares, sign and send each share to its
/// validator.
pub async fn run_round(
    state: Arc<FacilityState>,
    round: RoundId,
    previous_global_weights: Option<fedhier_types::model::WeightVector>,
) -> eyre::Result<()> {
    let shared = &state.config.shared;

    let initial_weights = previous_global_weights.unwrap_or_else(|| {
        fedhier_types::model::WeightVector::zeroed(
            &state
                .config
                .layer_lens
                .iter()
                .map(|len| vec![*len])
                .collect::<Vec<_>>(),
        )
    });

    let outcome = state
        .trainer
        .fit(&initial_weights, state.config.epochs, state.config.batch_size)
        .await?;
    let mut weights = outcome.weights().clone();

    let clip_norm = shared.dp_clip_norm;
    let epsilon = shared.dp_epsilon;
    let delta = shared.dp_delta;
    let layers: Vec<Vec<f32>> = weights.layers.iter().map(|l| l.values.clone()).collect();
    let mut layers = layers;
    dp::privatize(&mut layers, clip_norm, epsilon, delta);
    for (layer, values) in weights.layers.iter_mut().zip(layers.into_iter()) {
        layer.values = values;
    }

    let serialized = bincode::serialize(&weights)?;
    let compressed = compress(&serialized)?;

    let threshold = shared.secret_threshold;
    let total = shared.secret_total;
    let mut rng = rand::thread_rng();
    let share_bytes = shamir::split(&compressed, threshold, total, &mut rng)?;

    for (i, bytes) in share_bytes.into_iter().enumerate() {
        let share_id = (i + 1) as u32;
        let payload = bincode::serialize(&bytes)?;
        let share_uid_bytes = fedhier_types::wire::share_uid_hash(
            &state.config.facility_id,
            share_id,
            round.into_inner(),
            &payload,
        );
        let share_uid = fedhier_types::share::ShareUid::from_bytes(share_uid_bytes);

        let mut to_sign = payload.clone();
        to_sign.extend_from_slice(&share_id.to_be_bytes());
        to_sign.extend_from_slice(&round.into_inner().to_be_bytes());
        let signature = state.identity.sign(&to_sign);

        let share = Share {
            share_id,
            material: ShareMaterial::ShamirReal {
                share_id,
                bytes: payload,
                k: threshold,
                n: total,
            },
            threshold,
            total,
            facility_id: state.config.facility_id.clone().into(),
            round,
            signature,
            issuer_pubkey: state.identity.public_key_hex(),
            share_uid,
        };

        let validator_index = shared.validator_index_for_share(i as u32) as usize;
        let Some(validator_url) = state.config.validator_urls.get(validator_index) else {
            tracing::error!(validator_index, "no validator configured at this index");
            continue;
        };
        let url = format!("{validator_url}/validate_share");
        let request = ValidateShareRequest { share };
        match post_json_with_retry(
            &state.http,
            &url,
            &request,
            shared.transfer_timeout,
            shared.max_retries,
            std::time::Duration::from_millis(200),
        )
        .await
        {
            Ok(_) => {
                metrics::counter!(crate::metrics::METRICS_ID_SHARES_SENT).increment(1);
            }
            Err(err) => {
                metrics::counter!(crate::metrics::METRICS_ID_SHARE_SEND_FAILURES).increment(1);
                tracing::warn!(%err, share_id, "failed to deliver share to validator, continuing round");
            }
        }
    }

    state.advance_round(round.next());
    metrics::gauge!(crate::metrics::METRICS_ID_ROUND).set(round.next().into_inner() as f64);
    tracing::info!(round = %round, "completed training round");
    Ok(())
}

fn compress(data: &[u8]) -> eyre::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
