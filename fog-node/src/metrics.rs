pub const METRICS_ID_SHARES_RECEIVED: &str = "fog_node_shares_received_total";
pub const METRICS_ID_FACILITIES_RECONSTRUCTED: &str = "fog_node_facilities_reconstructed_total";
pub const METRICS_ID_FACILITIES_SKIPPED: &str = "fog_node_facilities_skipped_total";
pub const METRICS_ID_PARTIALS_SENT: &str = "fog_node_partials_sent_total";

pub fn describe_metrics() {
    metrics::describe_counter!(METRICS_ID_SHARES_RECEIVED, "Shares buffered this round");
    metrics::describe_counter!(
        METRICS_ID_FACILITIES_RECONSTRUCTED,
        "Facilities successfully reconstructed and folded into the partial"
    );
    metrics::describe_counter!(
        METRICS_ID_FACILITIES_SKIPPED,
        "Facilities skipped for ReconstructionFailure"
    );
    metrics::describe_counter!(METRICS_ID_PARTIALS_SENT, "FogPartials POSTed to the leader");
}
