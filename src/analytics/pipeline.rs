//! 点击记录管道
//!
//! 有界队列 + 单个后台 worker：
//! - `ClickRecorder::record` 只做 `try_send`，永不阻塞请求路径
//! - 队列满时直接丢弃并计数
//! - worker 串行写入 sink，按入队顺序（FIFO）处理
//! - 关闭时先拒绝新事件，再在截止时间内排空队列

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::analytics::{ClickEvent, ClickSink};
use crate::metrics_core::{ClickRecordStatus, MetricsRecorder, NoopMetrics};

/// 管道内部计数器
struct PipelineState {
    accepted: AtomicU64,
    dropped_full: AtomicU64,
    dropped_closed: AtomicU64,
    persisted: AtomicU64,
    failed: AtomicU64,
    capacity: usize,
    metrics: Arc<dyn MetricsRecorder>,
}

impl PipelineState {
    fn new(capacity: usize, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self {
            accepted: AtomicU64::new(0),
            dropped_full: AtomicU64::new(0),
            dropped_closed: AtomicU64::new(0),
            persisted: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            capacity,
            metrics,
        }
    }

    fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            accepted: self.accepted.load(Ordering::Acquire),
            dropped_full: self.dropped_full.load(Ordering::Acquire),
            dropped_closed: self.dropped_closed.load(Ordering::Acquire),
            persisted: self.persisted.load(Ordering::Acquire),
            failed: self.failed.load(Ordering::Acquire),
        }
    }
}

/// Point-in-time view of the pipeline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub accepted: u64,
    pub dropped_full: u64,
    pub dropped_closed: u64,
    pub persisted: u64,
    pub failed: u64,
}

impl PipelineStats {
    pub fn dropped(&self) -> u64 {
        self.dropped_full + self.dropped_closed
    }

    /// 已入队但尚未处理完的事件数
    pub fn pending(&self) -> u64 {
        self.accepted
            .saturating_sub(self.persisted)
            .saturating_sub(self.failed)
    }
}

/// Outcome of `ClickPipeline::shutdown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub stats: PipelineStats,
    /// 截止时间到达时仍未写入的事件
    pub lost: u64,
    pub timed_out: bool,
}

/// Cheap, cloneable producer handle given to request handlers.
#[derive(Clone)]
pub struct ClickRecorder {
    tx: Option<mpsc::Sender<ClickEvent>>,
    state: Arc<PipelineState>,
}

impl ClickRecorder {
    /// 不记录任何点击的 recorder（clicks.enabled = false 时使用）
    pub fn disabled() -> Self {
        Self {
            tx: None,
            state: Arc::new(PipelineState::new(0, NoopMetrics::arc())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// 非阻塞入队；失败只计数，不向调用方报告
    pub fn record(&self, event: ClickEvent) {
        let Some(tx) = &self.tx else {
            return;
        };

        match tx.try_send(event) {
            Ok(()) => {
                self.state.accepted.fetch_add(1, Ordering::AcqRel);
                let depth = self.state.capacity.saturating_sub(tx.capacity());
                self.state.metrics.set_click_queue_depth(depth as f64);
                trace!("Click event queued (depth={})", depth);
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.state.dropped_full.fetch_add(1, Ordering::AcqRel);
                self.state.metrics.inc_click_record(ClickRecordStatus::Dropped);
                debug!(
                    "Click queue full, dropping event for link_id={}",
                    event.link_id
                );
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                self.state.dropped_closed.fetch_add(1, Ordering::AcqRel);
                self.state.metrics.inc_click_record(ClickRecordStatus::Dropped);
                debug!(
                    "Click queue closed, dropping event for link_id={}",
                    event.link_id
                );
            }
        }
    }
}

pub struct ClickPipeline {
    tx: mpsc::Sender<ClickEvent>,
    state: Arc<PipelineState>,
    shutdown_tx: watch::Sender<bool>,
    worker: JoinHandle<()>,
}

impl ClickPipeline {
    /// 启动管道（必须在 tokio 运行时内调用）
    pub fn start(
        capacity: usize,
        sink: Arc<dyn ClickSink>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let state = Arc::new(PipelineState::new(capacity, metrics));

        let worker = tokio::spawn(run_worker(rx, sink, state.clone(), shutdown_rx));
        info!("Click pipeline started (capacity={})", capacity);

        Self {
            tx,
            state,
            shutdown_tx,
            worker,
        }
    }

    pub fn recorder(&self) -> ClickRecorder {
        ClickRecorder {
            tx: Some(self.tx.clone()),
            state: self.state.clone(),
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.state.snapshot()
    }

    /// 通知 worker 停止接收，排空已入队事件后返回
    ///
    /// 超过 `deadline` 仍未排空时放弃剩余事件并记录丢失数量。
    pub async fn shutdown(self, deadline: Duration) -> DrainReport {
        let Self {
            tx,
            state,
            shutdown_tx,
            mut worker,
        } = self;
        drop(tx);

        let pending = state.snapshot().pending();
        info!("Draining click pipeline ({} events pending)", pending);
        let _ = shutdown_tx.send(true);

        let timed_out = match tokio::time::timeout(deadline, &mut worker).await {
            Ok(Ok(())) => false,
            Ok(Err(e)) => {
                error!("Click pipeline worker failed: {}", e);
                false
            }
            Err(_) => {
                worker.abort();
                true
            }
        };

        let stats = state.snapshot();
        let lost = stats.pending();
        if timed_out {
            error!(
                "Click pipeline drain deadline ({:?}) exceeded, {} events lost",
                deadline, lost
            );
        } else {
            info!(
                "Click pipeline drained: {} persisted, {} failed, {} dropped",
                stats.persisted,
                stats.failed,
                stats.dropped()
            );
        }

        DrainReport {
            stats,
            lost,
            timed_out,
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    sink: Arc<dyn ClickSink>,
    state: Arc<PipelineState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => persist(&*sink, &state, &rx, event).await,
                None => break,
            },
            _ = shutdown_rx.changed() => break,
        }
    }

    // 拒绝新事件，已入队的照常写完
    rx.close();
    while let Some(event) = rx.recv().await {
        persist(&*sink, &state, &rx, event).await;
    }
    debug!("Click pipeline worker exited");
}

async fn persist(
    sink: &dyn ClickSink,
    state: &PipelineState,
    rx: &mpsc::Receiver<ClickEvent>,
    event: ClickEvent,
) {
    state.metrics.set_click_queue_depth(rx.len() as f64);

    match sink.insert_click_event(&event).await {
        Ok(()) => {
            state.persisted.fetch_add(1, Ordering::AcqRel);
            state.metrics.inc_click_record(ClickRecordStatus::Success);
        }
        Err(e) => {
            state.failed.fetch_add(1, Ordering::AcqRel);
            state.metrics.inc_click_record(ClickRecordStatus::Error);
            warn!(
                "Failed to persist click event for link_id={}: {}",
                event.link_id, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySink {
        rows: Mutex<Vec<i64>>,
    }

    #[async_trait::async_trait]
    impl ClickSink for MemorySink {
        async fn insert_click_event(&self, event: &ClickEvent) -> anyhow::Result<()> {
            self.rows.lock().unwrap().push(event.link_id);
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait::async_trait]
    impl ClickSink for FailingSink {
        async fn insert_click_event(&self, _event: &ClickEvent) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn event(link_id: i64) -> ClickEvent {
        ClickEvent {
            link_id,
            identity_id: None,
            client_hash: None,
            user_agent: None,
            referrer: None,
            clicked_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_events_persist_in_order() {
        let sink = Arc::new(MemorySink::default());
        let pipeline = ClickPipeline::start(256, sink.clone(), NoopMetrics::arc());
        let recorder = pipeline.recorder();

        for id in 0..50 {
            recorder.record(event(id));
        }

        let report = pipeline.shutdown(Duration::from_secs(5)).await;
        assert!(!report.timed_out);
        assert_eq!(report.lost, 0);
        assert_eq!(report.stats.persisted, 50);
        assert_eq!(*sink.rows.lock().unwrap(), (0..50).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_sink_failures_are_counted() {
        let pipeline = ClickPipeline::start(256, Arc::new(FailingSink), NoopMetrics::arc());
        let recorder = pipeline.recorder();
        recorder.record(event(1));
        recorder.record(event(2));

        let report = pipeline.shutdown(Duration::from_secs(5)).await;
        assert_eq!(report.stats.failed, 2);
        assert_eq!(report.stats.persisted, 0);
        assert_eq!(report.lost, 0);
    }

    #[tokio::test]
    async fn test_record_after_shutdown_is_dropped() {
        let sink = Arc::new(MemorySink::default());
        let pipeline = ClickPipeline::start(256, sink.clone(), NoopMetrics::arc());
        let recorder = pipeline.recorder();

        pipeline.shutdown(Duration::from_secs(5)).await;
        recorder.record(event(7));

        assert!(sink.rows.lock().unwrap().is_empty());
        assert_eq!(recorder.state.snapshot().dropped_closed, 1);
    }

    #[test]
    fn test_disabled_recorder_ignores_events() {
        let recorder = ClickRecorder::disabled();
        assert!(!recorder.is_enabled());
        recorder.record(event(1));
        assert_eq!(recorder.state.snapshot(), PipelineStats::default());
    }
}
