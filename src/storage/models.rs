use chrono::{DateTime, Utc};

/// 短链接映射，创建后不可变更
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub slug: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// 以当前时间创建新映射
    pub fn new(slug: String, target_url: String) -> Self {
        Self {
            slug,
            target_url,
            created_at: Utc::now(),
        }
    }
}
