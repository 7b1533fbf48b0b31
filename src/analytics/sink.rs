use super::ClickEvent;

/// 点击事件落盘 Sink
///
/// 由存储后端实现，ClickManager 批量调用。
#[async_trait::async_trait]
pub trait ClickSink: Send + Sync {
    async fn flush_events(&self, events: Vec<ClickEvent>) -> anyhow::Result<()>;
}
