use super::ClickEvent;

/// 点击事件持久化 Sink
///
/// 由单个后台 worker 串行调用，实现方无需处理并发写入。
#[async_trait::async_trait]
pub trait ClickSink: Send + Sync {
    async fn insert_click_event(&self, event: &ClickEvent) -> anyhow::Result<()>;
}
