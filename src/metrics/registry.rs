//! Global metrics registry
//!
//! Defines all Prometheus metrics used in the application.

use std::sync::OnceLock;

use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};

use crate::errors::{GolinkError, Result};
use crate::metrics_core::{ClickRecordStatus, ResolutionOutcome};

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Resolution latency buckets (seconds). Most redirects land in the sub-5ms range.
const RESOLUTION_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Application metrics container
pub struct Metrics {
    /// Internal Prometheus registry
    registry: Registry,

    // ===== Resolver metrics =====
    /// Resolution outcomes (found / not_found / error)
    pub resolutions_total: CounterVec,
    /// Resolution duration
    pub resolution_duration_seconds: Histogram,

    // ===== Click pipeline metrics =====
    /// Click records by status (success / error / dropped)
    pub click_records_total: CounterVec,
    /// Events waiting in the click queue
    pub click_queue_depth: Gauge,

    // ===== Gauges refreshed on an interval =====
    pub links_total: Gauge,
    pub identities_total: Gauge,

    // ===== System metrics =====
    /// Server uptime in seconds
    pub uptime_seconds: Gauge,
}

impl Metrics {
    fn new() -> Result<Self> {
        let registry = Registry::new();

        let resolutions_total = CounterVec::new(
            Opts::new(
                "golink_resolutions_total",
                "Total number of slug resolutions by outcome",
            ),
            &["outcome"],
        )?;

        let resolution_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "golink_resolution_duration_seconds",
                "Slug resolution duration in seconds",
            )
            .buckets(RESOLUTION_BUCKETS.to_vec()),
        )?;

        let click_records_total = CounterVec::new(
            Opts::new(
                "golink_click_records_total",
                "Click events by status (success, error, dropped)",
            ),
            &["status"],
        )?;

        let click_queue_depth = Gauge::new(
            "golink_click_queue_depth",
            "Click events currently waiting to be persisted",
        )?;

        let links_total = Gauge::new("golink_links_total", "Total number of links")?;
        let identities_total =
            Gauge::new("golink_identities_total", "Total number of identities")?;

        let uptime_seconds = Gauge::new("golink_uptime_seconds", "Server uptime in seconds")?;

        registry.register(Box::new(resolutions_total.clone()))?;
        registry.register(Box::new(resolution_duration_seconds.clone()))?;
        registry.register(Box::new(click_records_total.clone()))?;
        registry.register(Box::new(click_queue_depth.clone()))?;
        registry.register(Box::new(links_total.clone()))?;
        registry.register(Box::new(identities_total.clone()))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        // 预先创建所有标签组合，使导出结果从启动起就包含完整的序列
        for outcome in ResolutionOutcome::ALL {
            resolutions_total.with_label_values(&[outcome.as_label()]);
        }
        for status in ClickRecordStatus::ALL {
            click_records_total.with_label_values(&[status.as_label()]);
        }

        Ok(Self {
            registry,
            resolutions_total,
            resolution_duration_seconds,
            click_records_total,
            click_queue_depth,
            links_total,
            identities_total,
            uptime_seconds,
        })
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| GolinkError::metrics(format!("Metrics output is not valid UTF-8: {}", e)))
    }
}

/// Initialize the global metrics registry (idempotent).
pub fn init_metrics() -> Result<()> {
    if METRICS.get().is_some() {
        return Ok(());
    }
    let metrics = Metrics::new()?;
    // 并发初始化时后到者的实例直接丢弃
    let _ = METRICS.set(metrics);
    Ok(())
}

/// Get the global metrics registry, if initialized.
pub fn get_metrics() -> Option<&'static Metrics> {
    METRICS.get()
}
