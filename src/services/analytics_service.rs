//! Analytics service layer
//!
//! Provides unified business logic for analytics queries.
//!
//! 当前策略：从 click_events 表全量读取后在内存中聚合。数据量小时
//! 足够，规模上来后应改为预聚合或汇总表。

use std::sync::Arc;

use tracing::debug;

use crate::analytics::{AnalyticsSummary, summarize};
use crate::errors::Result;
use crate::storage::SeaOrmStorage;

/// Service for analytics queries
pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
}

impl AnalyticsService {
    /// Create a new AnalyticsService instance
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Scan all click events and fold them into a summary
    ///
    /// 每次请求都重新计算，不缓存结果。
    pub async fn get_summary(&self) -> Result<AnalyticsSummary> {
        let events = self.storage.scan_events().await?;
        let summary = summarize(&events);
        debug!(
            "AnalyticsService: aggregated {} events into {} days and {} referrers",
            summary.total_clicks,
            summary.clicks.len(),
            summary.top_referrers.len()
        );
        Ok(summary)
    }
}
