use std::time::Duration;

use tokio::signal;
use tracing::{info, warn};

use crate::analytics::{ClickPipeline, DrainReport};
use crate::services::GaugeRefresher;

/// 等待 Ctrl+C 或 SIGTERM
pub async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, shutting down..."),
        _ = terminate => info!("SIGTERM received, shutting down..."),
    }
}

/// 后台任务的关闭顺序：先停 gauge 刷新，再排空点击队列
///
/// HTTP 服务必须已经停止，这样排空期间不会再有新的点击进入。
pub async fn perform_shutdown_tasks(
    gauge_refresher: GaugeRefresher,
    pipeline: Option<ClickPipeline>,
    drain_deadline: Duration,
) -> Option<DrainReport> {
    gauge_refresher.stop().await;

    let Some(pipeline) = pipeline else {
        info!("Click pipeline is disabled, skipping drain");
        return None;
    };

    Some(pipeline.shutdown(drain_deadline).await)
}
