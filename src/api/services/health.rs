use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        (chrono::Utc::now() - self.start_datetime)
            .num_seconds()
            .max(0) as f64
    }
}

pub struct HealthService;

impl HealthService {
    // 活跃性检查，不访问存储
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
///
/// 只注册精确路径，`/health` 下的其他路径仍交给 redirect 处理
pub fn health_routes() -> actix_web::Resource {
    web::resource("/health/live")
        .route(web::get().to(HealthService::liveness_check))
        .route(web::head().to(HealthService::liveness_check))
}
