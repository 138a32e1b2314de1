//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus text format at the configured
//! path (default `/metrics`). No authentication.

use actix_web::{HttpResponse, Responder};

#[cfg(feature = "metrics")]
use actix_web::web;
#[cfg(feature = "metrics")]
use tracing::error;

#[cfg(feature = "metrics")]
use super::AppStartTime;

#[cfg(feature = "metrics")]
use crate::metrics::get_metrics;

/// Metrics service handler
pub struct MetricsService;

impl MetricsService {
    /// Handle metrics export request
    #[cfg(feature = "metrics")]
    pub async fn metrics(app_start_time: web::Data<AppStartTime>) -> impl Responder {
        let Some(metrics) = get_metrics() else {
            return HttpResponse::ServiceUnavailable()
                .content_type("text/plain")
                .body("Metrics not initialized");
        };

        metrics.uptime_seconds.set(app_start_time.uptime_seconds());

        match metrics.export() {
            Ok(output) => HttpResponse::Ok()
                .content_type("text/plain; version=0.0.4; charset=utf-8")
                .body(output),
            Err(e) => {
                error!("Failed to encode metrics: {}", e);
                HttpResponse::InternalServerError()
                    .content_type("text/plain")
                    .body("Failed to encode metrics")
            }
        }
    }

    /// Metrics not available when feature is disabled
    #[cfg(not(feature = "metrics"))]
    pub async fn metrics() -> impl Responder {
        HttpResponse::NotFound()
            .content_type("text/plain")
            .body("Metrics not enabled. Rebuild with --features metrics")
    }
}

/// Metrics 路由配置
pub fn metrics_routes(path: &str) -> actix_web::Resource {
    actix_web::web::resource(path).route(actix_web::web::get().to(MetricsService::metrics))
}
