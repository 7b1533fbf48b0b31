//! 短链接读穿缓存
//!
//! 映射创建后不可变更，缓存无需失效逻辑：
//! 命中即有效，未命中回源存储后回填。

mod moka;
mod null;

pub use self::moka::MokaLinkCache;
pub use self::null::NullLinkCache;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CacheConfig;
use crate::storage::ShortLink;

/// 链接缓存抽象
#[async_trait]
pub trait LinkCache: Send + Sync {
    async fn get(&self, slug: &str) -> Option<ShortLink>;
    async fn insert(&self, link: ShortLink);
}

/// 根据配置构建缓存实例
pub fn from_config(config: &CacheConfig) -> Arc<dyn LinkCache> {
    if config.enabled {
        Arc::new(MokaLinkCache::new(config.max_capacity, config.ttl_secs)) as Arc<dyn LinkCache>
    } else {
        Arc::new(NullLinkCache) as Arc<dyn LinkCache>
    }
}
