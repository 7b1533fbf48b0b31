use async_trait::async_trait;
use tracing::trace;

use super::LinkCache;
use crate::storage::ShortLink;

/// 缓存关闭时使用的空实现，所有查询都回源存储
pub struct NullLinkCache;

#[async_trait]
impl LinkCache for NullLinkCache {
    async fn get(&self, slug: &str) -> Option<ShortLink> {
        trace!("NullLinkCache.get called for slug: {}", slug);
        None
    }

    async fn insert(&self, _link: ShortLink) {
        trace!("NullLinkCache.insert called, no action taken");
    }
}
