//! `MetricsRecorder` backed by the global Prometheus registry.

use crate::metrics_core::{ClickRecordStatus, MetricsRecorder, ResolutionOutcome};

use super::get_metrics;

/// Wrapper that delegates to the global metrics registry.
///
/// Calls made before `init_metrics()` are silently ignored.
pub struct PrometheusMetricsWrapper;

impl MetricsRecorder for PrometheusMetricsWrapper {
    fn inc_resolution(&self, outcome: ResolutionOutcome) {
        if let Some(m) = get_metrics() {
            inc_counter!(m.resolutions_total, &[outcome.as_label()]);
        }
    }

    fn observe_resolution_duration(&self, duration_secs: f64) {
        if let Some(m) = get_metrics() {
            m.resolution_duration_seconds.observe(duration_secs);
        }
    }

    fn inc_click_record(&self, status: ClickRecordStatus) {
        if let Some(m) = get_metrics() {
            inc_counter!(m.click_records_total, &[status.as_label()]);
        }
    }

    fn set_click_queue_depth(&self, depth: f64) {
        if let Some(m) = get_metrics() {
            set_plain_gauge!(m.click_queue_depth, depth);
        }
    }

    fn set_link_count(&self, count: f64) {
        if let Some(m) = get_metrics() {
            set_plain_gauge!(m.links_total, count);
        }
    }

    fn set_identity_count(&self, count: f64) {
        if let Some(m) = get_metrics() {
            set_plain_gauge!(m.identities_total, count);
        }
    }
}
