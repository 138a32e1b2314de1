pub mod health;
pub mod metrics;
pub mod redirect;

pub use health::{AppStartTime, HealthService, health_routes};
pub use metrics::{MetricsService, metrics_routes};
pub use redirect::{RedirectContext, RedirectService, redirect_routes};
