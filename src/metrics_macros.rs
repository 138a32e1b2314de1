//! Metrics helper macros
//!
//! Reduces boilerplate for common metrics patterns across the codebase.

/// Increment a CounterVec with given labels.
///
/// Usage:
/// ```ignore
/// inc_counter!(metrics.resolutions_total, &["found"]);
/// ```
#[allow(unused_macros)]
macro_rules! inc_counter {
    ($counter:expr, $labels:expr) => {
        #[cfg(feature = "metrics")]
        $counter.with_label_values($labels).inc();
    };
}

/// Set a plain Gauge (no labels) to a value.
///
/// Usage:
/// ```ignore
/// set_plain_gauge!(metrics.click_queue_depth, depth as f64);
/// ```
#[allow(unused_macros)]
macro_rules! set_plain_gauge {
    ($gauge:expr, $value:expr) => {
        #[cfg(feature = "metrics")]
        $gauge.set($value);
    };
}
