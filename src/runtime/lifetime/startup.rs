use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::analytics::{ClickPipeline, ClickRecorder};
use crate::config::StaticConfig;
use crate::metrics_core::MetricsRecorder;
use crate::services::{GaugeRefresher, ResolverCore, ResolverSettings};
use crate::storage::{LinkRepository, SeaOrmStorage, StorageFactory};

#[cfg(feature = "metrics")]
use crate::metrics::{PrometheusMetricsWrapper, init_metrics};
#[cfg(not(feature = "metrics"))]
use crate::metrics_core::NoopMetrics;

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub resolver: Arc<ResolverCore>,
    pub metrics: Arc<dyn MetricsRecorder>,
    /// `clicks.enabled = false` 时为 None
    pub pipeline: Option<ClickPipeline>,
    pub gauge_refresher: GaugeRefresher,
}

/// 创建指标记录器（未启用 metrics feature 时为 Noop）
pub fn build_metrics_recorder() -> Result<Arc<dyn MetricsRecorder>> {
    #[cfg(feature = "metrics")]
    {
        init_metrics().context("Failed to initialize metrics registry")?;
        Ok(Arc::new(PrometheusMetricsWrapper))
    }

    #[cfg(not(feature = "metrics"))]
    {
        Ok(NoopMetrics::arc())
    }
}

/// 准备服务器启动的上下文
/// 包括存储、点击管道、解析器与 gauge 刷新任务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let metrics = build_metrics_recorder()?;

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let (pipeline, recorder) = if config.clicks.enabled {
        let pipeline = ClickPipeline::start(
            config.clicks.queue_capacity,
            storage.clone(),
            metrics.clone(),
        );
        let recorder = pipeline.recorder();
        (Some(pipeline), recorder)
    } else {
        warn!("Click recording is disabled");
        (None, ClickRecorder::disabled())
    };

    let repo: Arc<dyn LinkRepository> = storage.clone();
    let resolver = Arc::new(ResolverCore::new(
        repo.clone(),
        recorder,
        metrics.clone(),
        ResolverSettings::from_config(&config.resolver, &config.clicks),
    ));

    let gauge_refresher = GaugeRefresher::spawn(
        repo,
        metrics.clone(),
        Duration::from_secs(config.metrics.gauge_refresh_interval_secs),
    );

    info!("Pre-startup completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        storage,
        resolver,
        metrics,
        pipeline,
        gauge_refresher,
    })
}
