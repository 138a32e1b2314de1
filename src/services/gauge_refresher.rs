//! 周期性刷新链接数与身份数 gauge
//!
//! 计数查询不进入请求热路径，只在后台按固定间隔执行。

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::metrics_core::MetricsRecorder;
use crate::storage::LinkRepository;

pub struct GaugeRefresher {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl GaugeRefresher {
    /// Spawn the refresh task; the first refresh happens immediately.
    pub fn spawn(
        repo: Arc<dyn LinkRepository>,
        metrics: Arc<dyn MetricsRecorder>,
        every: Duration,
    ) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => refresh_once(&*repo, &*metrics).await,
                    _ = shutdown_rx.changed() => break,
                }
            }
            debug!("Gauge refresher stopped");
        });

        info!("Gauge refresher started (every {:?})", every);
        Self {
            shutdown_tx,
            handle,
        }
    }

    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!("Gauge refresher task ended abnormally: {}", e);
        }
    }
}

/// 执行一次刷新；查询失败时保留上一次的值
pub async fn refresh_once(repo: &dyn LinkRepository, metrics: &dyn MetricsRecorder) {
    match repo.count_links().await {
        Ok(count) => metrics.set_link_count(count as f64),
        Err(e) => warn!("Failed to count links for gauge: {}", e),
    }
    match repo.count_identities().await {
        Ok(count) => metrics.set_identity_count(count as f64),
        Err(e) => warn!("Failed to count identities for gauge: {}", e),
    }
}
