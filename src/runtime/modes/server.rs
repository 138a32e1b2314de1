//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::services::{
    AppStartTime, RedirectContext, health_routes, metrics_routes, redirect_routes,
};
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// 注册所有路由
///
/// 命名路由（health、metrics）必须先于兜底的 redirect 路由注册。
pub fn configure_routes(cfg: &mut web::ServiceConfig, metrics_path: &str) {
    cfg.service(health_routes())
        .service(metrics_routes(metrics_path))
        .service(redirect_routes());
}

/// Run the HTTP server
///
/// This function:
/// 1. Prepares server components (storage, click pipeline, resolver)
/// 2. Configures and starts the HTTP server
/// 3. Waits for Ctrl+C / SIGTERM, stops accepting requests, then drains
///    the click pipeline
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    let app_start_time = web::Data::new(AppStartTime::now());

    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {}", e))?;

    let redirect_ctx = web::Data::new(RedirectContext::new(startup.resolver.clone(), &config));
    let metrics_path = config.metrics.path.clone();

    if config.auth.trust_identity_headers {
        warn!(
            "Trusting identity headers ({}); make sure only the auth proxy can reach this server",
            config.auth.user_id_header
        );
    }

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(redirect_ctx.clone())
            .app_data(app_start_time.clone())
            .configure(|cfg| configure_routes(cfg, &metrics_path))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!("Starting server at http://{}", bind_address);

    // 收到信号后停止接收新连接，等待进行中的请求完成
    let handle = server.handle();
    let stopper = tokio::spawn(async move {
        lifetime::shutdown::wait_for_shutdown_signal().await;
        info!("Stopping HTTP server gracefully...");
        handle.stop(true).await;
    });

    let served = server.await;
    stopper.abort();

    lifetime::shutdown::perform_shutdown_tasks(
        startup.gauge_refresher,
        startup.pipeline,
        Duration::from_secs(config.clicks.shutdown_timeout_secs),
    )
    .await;

    served.context("HTTP server exited with an error")?;
    info!("Graceful shutdown: all tasks completed");
    Ok(())
}
