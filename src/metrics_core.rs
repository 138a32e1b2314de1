//! Core metrics traits (always compiled, no feature gate).
//!
//! Provides `MetricsRecorder` trait and `NoopMetrics` so that all modules
//! can accept `Arc<dyn MetricsRecorder>` unconditionally.  When the
//! `metrics` feature is disabled, `NoopMetrics` is injected and the
//! compiler optimises every call to a no-op.
//!
//! Label values are closed enums. Nothing here accepts a free-form string,
//! so a request slug can never end up as a label.

use std::sync::Arc;

/// Outcome label of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionOutcome {
    /// A link matched (whatever the authorization decision was).
    Found,
    /// No link matched, or the template arity disagreed.
    NotFound,
    /// Store failure or lookup timeout.
    Error,
}

impl ResolutionOutcome {
    pub const ALL: [ResolutionOutcome; 3] = [Self::Found, Self::NotFound, Self::Error];

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

/// Status label of one click record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickRecordStatus {
    Success,
    Error,
    Dropped,
}

impl ClickRecordStatus {
    pub const ALL: [ClickRecordStatus; 3] = [Self::Success, Self::Error, Self::Dropped];

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Dropped => "dropped",
        }
    }
}

/// Trait for recording application metrics.
///
/// All methods are no-op by default, allowing partial implementation.
/// Implementations must be thread-safe (Send + Sync).
#[allow(unused_variables)]
pub trait MetricsRecorder: Send + Sync {
    // ===== Resolver =====

    /// Record one resolution outcome
    fn inc_resolution(&self, outcome: ResolutionOutcome) {}

    /// Observe resolution duration
    fn observe_resolution_duration(&self, duration_secs: f64) {}

    // ===== Click pipeline =====

    /// Record one click event outcome (persisted, failed, dropped)
    fn inc_click_record(&self, status: ClickRecordStatus) {}

    /// Set the number of events currently queued
    fn set_click_queue_depth(&self, depth: f64) {}

    // ===== Gauges =====

    /// Set total link count
    fn set_link_count(&self, count: f64) {}

    /// Set total identity count
    fn set_identity_count(&self, count: f64) {}
}

/// Noop metrics implementation for testing and non-metrics builds.
///
/// All methods do nothing, allowing code to run without Prometheus dependencies.
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {}

impl NoopMetrics {
    pub fn new() -> Self {
        Self
    }

    pub fn arc() -> Arc<dyn MetricsRecorder> {
        Arc::new(Self::new())
    }
}

impl Default for NoopMetrics {
    fn default() -> Self {
        Self::new()
    }
}
