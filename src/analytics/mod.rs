pub mod aggregate;
pub mod manager;
pub mod sink;

pub use aggregate::{AnalyticsSummary, DailyClicks, ReferrerCount, summarize};
pub use manager::ClickManager;
pub use sink::ClickSink;

use chrono::{DateTime, Utc};

/// 单次点击事件
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    /// 被点击的短链接
    pub slug: String,
    /// 点击时间戳
    pub timestamp: DateTime<Utc>,
    /// 来源页面 (Referer header)
    pub referrer: Option<String>,
    /// 用户代理 (User-Agent header)
    pub user_agent: Option<String>,
}

impl ClickEvent {
    /// 创建新的点击事件，时间取当前时刻
    pub fn new(slug: String) -> Self {
        Self {
            slug,
            timestamp: Utc::now(),
            referrer: None,
            user_agent: None,
        }
    }

    /// 附加请求头中的来源信息
    pub fn with_request_info(
        mut self,
        referrer: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        self.referrer = referrer;
        self.user_agent = user_agent;
        self
    }
}
