pub const METRICS_ID_PARTIALS_RECEIVED: &str = "leader_partials_received_total";
pub const METRICS_ID_ROUNDS_AGGREGATED: &str = "leader_rounds_aggregated_total";
pub const METRICS_ID_ROUNDS_ABORTED: &str = "leader_rounds_aborted_total";

pub fn describe_metrics() {
    metrics::describe_counter!(METRICS_ID_PARTIALS_RECEIVED, "FogPartials buffered this round");
    metrics::describe_counter!(
        METRICS_ID_ROUNDS_AGGREGATED,
        "Rounds where global aggregation succeeded"
    );
    metrics::describe_counter!(
        METRICS_ID_ROUNDS_ABORTED,
        "Rounds aborted for QuorumUnmet"
    );
}
