//! Registration and distribution (`spec.md` §4.5).

use std::sync::Arc;

use fedhier_crypto::{abe, pow};
use fedhier_net::retry::post_json_with_retry;
use fedhier_net::RoundError;
use fedhier_types::dto::{ReceiveGlobalModelRequest, RegisterFacilityRequest, RegisterFacilityResponse};
use fedhier_types::model::{FacilityRecord, FacilityStatus, GlobalModel};

use crate::state::TaState;

pub async fn register_facility(
    state: Arc<TaState>,
    request: RegisterFacilityRequest,
) -> Result<RegisterFacilityResponse, RoundError> {
    if !pow::verify(
        request.facility_id.as_str(),
        &request.public_key,
        request.pow_nonce,
        state.config.shared.pow_difficulty,
    ) {
        metrics::counter!(crate::metrics::METRICS_ID_REGISTRATIONS_REJECTED).increment(1);
        return Err(RoundError::AuthFailure(format!(
            "proof-of-work does not meet difficulty {}",
            state.config.shared.pow_difficulty
        )));
    }

    let issued_key = state.identity.sign(request.public_key.as_bytes());
    let record = FacilityRecord {
        facility_id: request.facility_id,
        public_key: request.public_key,
        attributes: request.attributes,
        status: FacilityStatus::Registered,
        issued_key: issued_key.clone(),
    };
    state.insert(record);
    metrics::counter!(crate::metrics::METRICS_ID_FACILITIES_REGISTERED).increment(1);

    Ok(RegisterFacilityResponse {
        status: FacilityStatus::Registered,
        issued_key,
    })
}

pub fn revoke_facility(state: &TaState, facility_id: &fedhier_types::FacilityId) -> bool {
    let revoked = state.revoke(facility_id);
    if revoked {
        metrics::counter!(crate::metrics::METRICS_ID_FACILITIES_REVOKED).increment(1);
    }
    revoked
}

/// Wraps the global model under the run's distribution policy and
/// fans it out to every eligible, reachable facility. Per `spec.md`
/// §4.5: "undeliverable facilities are excluded from the next round's
/// broadcast until they re-register."
pub async fn distribute_global_model(state: Arc<TaState>, global: GlobalModel) -> eyre::Result<()> {
    let policy = state.config.policy();
    let policy_bytes = bincode::serialize(&policy)?;
    let weights_bytes = bincode::serialize(&global.weights)?;
    let wrapped = abe::wrap(&weights_bytes, &policy_bytes);

    let eligible: Vec<FacilityRecord> = state
        .eligible_candidates()
        .into_iter()
        .filter(|record| match &policy {
            Some(policy) => abe::evaluate(policy, &record.attributes),
            None => true,
        })
        .collect();

    for record in eligible {
        let Some(url) = state.config.facility_url(record.facility_id.as_str()) else {
            tracing::warn!(facility_id = %record.facility_id, "no known URL for eligible facility, skipping");
            continue;
        };
        let request = ReceiveGlobalModelRequest {
            round: global.round,
            encrypted_data: wrapped.clone(),
            policy_bytes: policy_bytes.clone(),
        };
        let endpoint = format!("{url}/receive_global_model");
        match post_json_with_retry(
            &state.http,
            &endpoint,
            &request,
            state.config.shared.transfer_timeout,
            state.config.shared.max_retries,
            std::time::Duration::from_millis(200),
        )
        .await
        {
            Ok(_) => {
                metrics::counter!(crate::metrics::METRICS_ID_MODELS_DISTRIBUTED).increment(1);
            }
            Err(err) => {
                tracing::warn!(facility_id = %record.facility_id, %err, "delivery failed, excluding until re-registration");
                metrics::counter!(crate::metrics::METRICS_ID_DELIVERIES_FAILED).increment(1);
                state.mark_undeliverable(record.facility_id);
            }
        }
    }

    Ok(())
}
