//! Prometheus metrics module
//!
//! Provides metrics collection and export for monitoring.
//!
//! # Feature
//! This module requires the `metrics` feature to be enabled.

mod recorder;
mod registry;

pub use recorder::PrometheusMetricsWrapper;
pub use registry::{Metrics, get_metrics, init_metrics};
