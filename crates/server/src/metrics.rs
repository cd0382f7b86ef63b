//! Prometheus metrics

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once; the first
/// installation wins.
pub fn init_metrics() -> Result<(), String> {
    if HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| e.to_string())?;

    let _ = HANDLE.set(handle);
    Ok(())
}

/// Render the current metrics snapshot for the /metrics route.
pub async fn metrics_handler() -> String {
    HANDLE.get().map(|h| h.render()).unwrap_or_default()
}

/// One answer turn processed, labelled with the flow outcome.
pub fn record_answer_turn(action: &'static str) {
    metrics::counter!("survey_answer_turns_total", "action" => action).increment(1);
}

/// An upstream provider call failed.
pub fn record_upstream_failure(provider: &'static str) {
    metrics::counter!("survey_upstream_failures_total", "provider" => provider).increment(1);
}

/// Transcription latency in seconds.
pub fn record_stt_latency(seconds: f64) {
    metrics::histogram!("survey_stt_latency_seconds").record(seconds);
}
