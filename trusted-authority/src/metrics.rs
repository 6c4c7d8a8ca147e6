pub const METRICS_ID_FACILITIES_REGISTERED: &str = "ta_facilities_registered_total";
pub const METRICS_ID_REGISTRATIONS_REJECTED: &str = "ta_registrations_rejected_total";
pub const METRICS_ID_FACILITIES_REVOKED: &str = "ta_facilities_revoked_total";
pub const METRICS_ID_MODELS_DISTRIBUTED: &str = "ta_models_distributed_total";
pub const METRICS_ID_DELIVERIES_FAILED: &str = "ta_deliveries_failed_total";

pub fn describe_metrics() {
    metrics::describe_counter!(METRICS_ID_FACILITIES_REGISTERED, "Facilities successfully registered");
    metrics::describe_counter!(
        METRICS_ID_REGISTRATIONS_REJECTED,
        "Registration attempts rejected for bad PoW or signature"
    );
    metrics::describe_counter!(METRICS_ID_FACILITIES_REVOKED, "Facilities revoked");
    metrics::describe_counter!(
        METRICS_ID_MODELS_DISTRIBUTED,
        "Wrapped global models delivered to eligible facilities"
    );
    metrics::describe_counter!(
        METRICS_ID_DELIVERIES_FAILED,
        "Distribution deliveries that exhausted retries"
    );
}
