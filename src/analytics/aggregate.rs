//! 点击事件汇总
//!
//! 将全量点击事件折叠为分析摘要：按天计数、Top 来源、总点击数。

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::ClickEvent;

/// 未携带 Referer 的点击归入该来源
pub const DIRECT_REFERRER: &str = "Direct";

/// 返回的 Top 来源数量上限
pub const TOP_REFERRER_LIMIT: usize = 5;

/// 单日点击数（日期为 UTC，格式 YYYY-MM-DD）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyClicks {
    pub date: String,
    pub count: u64,
}

/// 单个来源的点击数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferrerCount {
    pub referrer: String,
    pub count: u64,
}

/// 分析摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub clicks: Vec<DailyClicks>,
    pub top_referrers: Vec<ReferrerCount>,
    pub total_clicks: u64,
}

/// 汇总全量点击事件
///
/// 日期桶按 UTC 日升序排列；来源按点击数降序，
/// 次数相同时按名称升序，保证输出稳定。
pub fn summarize(events: &[ClickEvent]) -> AnalyticsSummary {
    let mut daily: BTreeMap<String, u64> = BTreeMap::new();
    let mut referrers: HashMap<String, u64> = HashMap::new();

    for event in events {
        let date = event.timestamp.format("%Y-%m-%d").to_string();
        *daily.entry(date).or_insert(0) += 1;

        // 缺失或为空的 Referer 计入 "Direct"
        let referrer = event
            .referrer
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(DIRECT_REFERRER);
        *referrers.entry(referrer.to_string()).or_insert(0) += 1;
    }

    let clicks = daily
        .into_iter()
        .map(|(date, count)| DailyClicks { date, count })
        .collect();

    let mut top_referrers: Vec<ReferrerCount> = referrers
        .into_iter()
        .map(|(referrer, count)| ReferrerCount { referrer, count })
        .collect();
    top_referrers.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.referrer.cmp(&b.referrer)));
    top_referrers.truncate(TOP_REFERRER_LIMIT);

    AnalyticsSummary {
        clicks,
        top_referrers,
        total_clicks: events.len() as u64,
    }
}
