//! Metrics identifiers, following `oprf-service`'s `METRICS_ID_*`
//! constant-plus-`describe_metrics` pattern.

pub const METRICS_ID_ROUND: &str = "facility_round";
pub const METRICS_ID_SHARES_SENT: &str = "facility_shares_sent_total";
pub const METRICS_ID_SHARE_SEND_FAILURES: &str = "facility_share_send_failures_total";
pub const METRICS_ID_GLOBAL_MODELS_RECEIVED: &str = "facility_global_models_received_total";

pub fn describe_metrics() {
    metrics::describe_gauge!(METRICS_ID_ROUND, "Current local training round");
    metrics::describe_counter!(METRICS_ID_SHARES_SENT, "Shares successfully POSTed to validators");
    metrics::describe_counter!(
        METRICS_ID_SHARE_SEND_FAILURES,
        "Shares that exhausted retries without a successful POST"
    );
    metrics::describe_counter!(
        METRICS_ID_GLOBAL_MODELS_RECEIVED,
        "Global models accepted via /receive_global_model"
    );
}
