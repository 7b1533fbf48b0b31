//! 点击事件管理器
//!
//! 负责收集和刷新点击事件，支持：
//! - 高并发事件缓冲（使用 DashMap）
//! - 定时刷盘到存储后端
//! - 阈值触发刷盘
//! - 刷盘失败时事件回填缓冲区

use dashmap::DashMap;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
};
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};
use tracing::{debug, trace, warn};

use crate::analytics::{ClickEvent, ClickSink};

/// 点击事件缓冲区状态，封装所有可变状态
struct ClickBuffer {
    /// 事件缓冲区，以单调递增 ID 为键
    data: DashMap<u64, ClickEvent>,
    /// 下一个事件 ID
    next_id: AtomicU64,
    /// 缓冲区中的事件总数（用于阈值判断）
    buffered: AtomicUsize,
    /// 刷盘锁，防止并发刷盘
    flush_lock: Mutex<()>,
    /// 是否有 flush 任务待处理（防止重复 spawn）
    flush_pending: AtomicBool,
}

impl ClickBuffer {
    fn new() -> Self {
        Self {
            data: DashMap::new(),
            next_id: AtomicU64::new(0),
            buffered: AtomicUsize::new(0),
            flush_lock: Mutex::new(()),
            flush_pending: AtomicBool::new(false),
        }
    }

    /// 追加事件，返回当前缓冲区大小
    fn push(&self, event: ClickEvent) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.data.insert(id, event);
        trace!("ClickBuffer: Buffered event #{}", id);

        self.buffered.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 收集所有事件并清空缓冲区（逐个 remove 避免竞态）
    fn drain(&self) -> Vec<ClickEvent> {
        // 1. 收集所有 key（snapshot）
        let keys: Vec<u64> = self.data.iter().map(|r| *r.key()).collect();

        // 2. 逐个 remove（只删除 snapshot 中的 key，不影响窗口期新增）
        let mut events = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some((_, event)) = self.data.remove(&key) {
                events.push(event);
            }
        }

        // 3. 更新总计数
        let removed = events.len();
        if removed > 0 {
            self.buffered
                .fetch_update(Ordering::Release, Ordering::Relaxed, |current| {
                    Some(current.saturating_sub(removed))
                })
                .ok();
        }

        events
    }

    /// 恢复事件到缓冲区（用于刷盘失败时的恢复）
    fn restore(&self, events: Vec<ClickEvent>) {
        let restored = events.len();
        for event in events {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            self.data.insert(id, event);
        }
        self.buffered.fetch_add(restored, Ordering::Relaxed);
    }

    /// 获取当前缓冲区事件总数
    fn len(&self) -> usize {
        self.buffered.load(Ordering::Relaxed)
    }
}

/// 点击管理器
///
/// 负责收集点击事件并定期刷盘到存储后端。
/// 状态完全封装在结构体内部，便于测试和多实例使用。
#[derive(Clone)]
pub struct ClickManager {
    /// 事件缓冲区（共享所有权）
    buffer: Arc<ClickBuffer>,
    /// 存储后端
    sink: Arc<dyn ClickSink>,
    /// 刷盘间隔
    flush_interval: Duration,
    /// 触发刷盘的最大缓冲事件数
    max_buffered_before_flush: usize,
}

impl ClickManager {
    pub fn new(
        sink: Arc<dyn ClickSink>,
        flush_interval: Duration,
        max_buffered_before_flush: usize,
    ) -> Self {
        Self {
            buffer: Arc::new(ClickBuffer::new()),
            sink,
            flush_interval,
            max_buffered_before_flush,
        }
    }

    /// 记录一次点击（线程安全，无锁，不等待落盘）
    pub fn record(&self, event: ClickEvent) {
        let current_size = self.buffer.push(event);
        trace!("ClickManager: Current buffer size: {}", current_size);

        // 检查是否达到阈值，尝试触发刷盘
        if current_size >= self.max_buffered_before_flush {
            // 使用 compare_exchange 防止任务风暴：
            // 只有成功将 flush_pending 从 false 设为 true 的线程才 spawn
            if self
                .buffer
                .flush_pending
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                let buffer = Arc::clone(&self.buffer);
                let sink = Arc::clone(&self.sink);
                tokio::spawn(async move {
                    if let Ok(_guard) = buffer.flush_lock.try_lock() {
                        Self::flush_buffer(&buffer, &sink).await;
                    } else {
                        trace!("ClickManager: flush already in progress, skipping");
                    }
                    // 无论成功与否都重置标志，允许下次触发
                    buffer.flush_pending.store(false, Ordering::Release);
                });
            }
        }
    }

    /// 启动后台刷盘任务（作为异步方法运行）
    pub async fn start_background_task(&self) {
        loop {
            sleep(self.flush_interval).await;

            debug!("ClickManager: Triggering scheduled flush");
            // 定期触发刷盘
            if let Ok(_guard) = self.buffer.flush_lock.try_lock() {
                trace!("ClickManager: Starting scheduled flush");
                Self::flush_buffer(&self.buffer, &self.sink).await;
            } else {
                trace!("ClickManager: flush already in progress, skipping scheduled flush");
            }
        }
    }

    /// 手动触发刷盘（阻塞直到完成）
    pub async fn flush(&self) {
        debug!("ClickManager: Manual flush triggered");
        let _guard = self.buffer.flush_lock.lock().await;
        Self::flush_buffer(&self.buffer, &self.sink).await;
    }

    /// 执行实际的刷盘操作
    async fn flush_buffer(buffer: &ClickBuffer, sink: &Arc<dyn ClickSink>) {
        let events = buffer.drain();

        if events.is_empty() {
            trace!("ClickManager: No events to flush");
            return;
        }

        let count = events.len();
        match sink.flush_events(events.clone()).await {
            Ok(_) => {
                debug!("ClickManager: Successfully flushed {} events", count);
            }
            Err(e) => {
                // 刷盘失败，恢复数据到 buffer
                buffer.restore(events);
                warn!(
                    "ClickManager: flush_events failed: {}, {} events restored to buffer",
                    e, count
                );
            }
        }
    }

    /// 获取当前缓冲区事件总数（用于监控）
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct MockSink {
        flushed: std::sync::Mutex<Vec<ClickEvent>>,
        fail: AtomicBool,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                flushed: std::sync::Mutex::new(Vec::new()),
                fail: AtomicBool::new(false),
            }
        }

        fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn get_flushed(&self) -> Vec<ClickEvent> {
            self.flushed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ClickSink for MockSink {
        async fn flush_events(&self, events: Vec<ClickEvent>) -> anyhow::Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("sink unavailable");
            }
            self.flushed.lock().unwrap().extend(events);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_record_and_flush() {
        let sink = Arc::new(MockSink::new());
        let manager = ClickManager::new(
            Arc::clone(&sink) as Arc<dyn ClickSink>,
            Duration::from_secs(60),
            100,
        );

        manager.record(ClickEvent::new("abc123".to_string()));
        manager.record(ClickEvent::new("abc123".to_string()));
        manager.record(ClickEvent::new("xyz789".to_string()));

        // buffer_size() 返回事件总数，同一 slug 的事件不合并
        assert_eq!(manager.buffer_size(), 3);

        manager.flush().await;

        assert_eq!(manager.buffer_size(), 0);
        let flushed = sink.get_flushed();
        assert_eq!(flushed.len(), 3);
        assert_eq!(flushed.iter().filter(|e| e.slug == "abc123").count(), 2);
    }

    /// 测试并发 record 不会丢失事件
    #[tokio::test]
    async fn test_concurrent_record() {
        let sink = Arc::new(MockSink::new());
        let manager = Arc::new(ClickManager::new(
            Arc::clone(&sink) as Arc<dyn ClickSink>,
            Duration::from_secs(60),
            100000, // 高阈值，避免自动刷盘
        ));

        const NUM_TASKS: usize = 10;
        const EVENTS_PER_TASK: usize = 1000;

        let mut handles = vec![];
        for _ in 0..NUM_TASKS {
            let mgr = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                for _ in 0..EVENTS_PER_TASK {
                    mgr.record(ClickEvent::new("shared_slug".to_string()));
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        // 验证 buffer 中的事件数正确
        assert_eq!(manager.buffer_size(), NUM_TASKS * EVENTS_PER_TASK);

        manager.flush().await;

        // 验证刷盘后的数据正确
        assert_eq!(sink.get_flushed().len(), NUM_TASKS * EVENTS_PER_TASK);
    }

    /// 测试并发 record + drain 不会丢失数据
    #[tokio::test]
    async fn test_concurrent_record_and_drain() {
        let sink = Arc::new(MockSink::new());
        let manager = Arc::new(ClickManager::new(
            Arc::clone(&sink) as Arc<dyn ClickSink>,
            Duration::from_secs(60),
            100000, // 高阈值，避免自动刷盘
        ));

        const NUM_TASKS: usize = 10;
        const EVENTS_PER_TASK: usize = 1000;
        const NUM_FLUSHES: usize = 5;

        // 启动 record 任务
        let mut handles = vec![];
        for _ in 0..NUM_TASKS {
            let mgr = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                for _ in 0..EVENTS_PER_TASK {
                    mgr.record(ClickEvent::new("shared_slug".to_string()));
                    // 偶尔 yield，增加与 drain 交错的机会
                    if rand::random::<u8>() < 10 {
                        tokio::task::yield_now().await;
                    }
                }
            }));
        }

        // 启动 flush 任务
        let mgr_flush = Arc::clone(&manager);
        let flush_handle = tokio::spawn(async move {
            for _ in 0..NUM_FLUSHES {
                tokio::time::sleep(Duration::from_millis(10)).await;
                mgr_flush.flush().await;
            }
        });

        // 等待所有 record 完成
        for handle in handles {
            handle.await.unwrap();
        }
        flush_handle.await.unwrap();

        // 最后一次 flush 确保所有数据都写入
        manager.flush().await;

        // 验证总事件数 = 已刷盘 + buffer 中剩余
        let flushed = sink.get_flushed().len();
        let remaining = manager.buffer_size();
        assert_eq!(
            flushed + remaining,
            NUM_TASKS * EVENTS_PER_TASK,
            "flushed={}, remaining={}, expected={}",
            flushed,
            remaining,
            NUM_TASKS * EVENTS_PER_TASK
        );
    }

    /// 测试刷盘失败时事件回填缓冲区，等待下次重试
    #[tokio::test]
    async fn test_flush_failure_restores_buffer() {
        let sink = Arc::new(MockSink::new());
        let manager = ClickManager::new(
            Arc::clone(&sink) as Arc<dyn ClickSink>,
            Duration::from_secs(60),
            100,
        );

        manager.record(ClickEvent::new("abc123".to_string()));
        manager.record(ClickEvent::new("xyz789".to_string()));

        sink.set_fail(true);
        manager.flush().await;

        // 刷盘失败，事件应全部回到缓冲区
        assert_eq!(manager.buffer_size(), 2);
        assert!(sink.get_flushed().is_empty());

        // 存储恢复后，下次刷盘成功写入
        sink.set_fail(false);
        manager.flush().await;

        assert_eq!(manager.buffer_size(), 0);
        assert_eq!(sink.get_flushed().len(), 2);
    }
}
