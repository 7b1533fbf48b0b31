//! Link management service
//!
//! Provides unified business logic for link creation and resolution,
//! shared between the shorten and redirect handlers.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::LinkCache;
use crate::errors::{Result, SnaplinkError};
use crate::storage::{SeaOrmStorage, ShortLink};
use crate::utils::url_validator::{validate_url, validation_error_message};
use crate::utils::{DEFAULT_SLUG_LENGTH, generate_slug, is_reserved_slug, is_valid_slug};

/// 随机短码碰撞后的最大重试次数
const MAX_SLUG_ATTEMPTS: u32 = 3;

// ============ Request/Response DTOs ============

/// Request to create a new link
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    /// Target URL
    pub target_url: String,
    /// Custom slug (optional, will be generated if not provided)
    pub custom_slug: Option<String>,
}

/// Result of link creation
#[derive(Debug, Clone)]
pub struct LinkCreateResult {
    /// The created link
    pub link: ShortLink,
    /// Whether the slug was auto-generated
    pub generated_slug: bool,
}

// ============ LinkService Implementation ============

/// Service for link creation and resolution
///
/// This service encapsulates the business logic for link operations,
/// ensuring consistent behavior across handlers.
pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    cache: Arc<dyn LinkCache>,
}

impl LinkService {
    /// Create a new LinkService instance
    pub fn new(storage: Arc<SeaOrmStorage>, cache: Arc<dyn LinkCache>) -> Self {
        Self { storage, cache }
    }

    /// Create a new short link
    ///
    /// 自定义短码被占用直接报错；随机短码碰撞时换新重试，
    /// 最多 MAX_SLUG_ATTEMPTS 次。
    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<LinkCreateResult> {
        // Validate URL
        validate_url(&req.target_url)
            .map_err(|e| SnaplinkError::validation(validation_error_message(&e)))?;

        match req.custom_slug.filter(|s| !s.is_empty()) {
            Some(slug) => self.create_with_custom_slug(slug, req.target_url).await,
            None => self.create_with_random_slug(req.target_url).await,
        }
    }

    async fn create_with_custom_slug(
        &self,
        slug: String,
        target_url: String,
    ) -> Result<LinkCreateResult> {
        // Validate slug format
        if !is_valid_slug(&slug) {
            return Err(SnaplinkError::validation(format!(
                "Invalid slug '{}'. Only alphanumeric, underscore, and hyphen allowed.",
                slug
            )));
        }
        // Check reserved route conflicts
        if is_reserved_slug(&slug) {
            return Err(SnaplinkError::validation(format!(
                "Slug '{}' conflicts with reserved routes",
                slug
            )));
        }

        let link = ShortLink::new(slug, target_url);
        if !self.storage.insert_link(&link).await? {
            // 短码由调用方指定，被占用时无法代为换新
            return Err(SnaplinkError::storage(format!(
                "Slug '{}' already exists",
                link.slug
            )));
        }

        self.cache.insert(link.clone()).await;
        info!(
            "LinkService: created link '{}' -> '{}'",
            link.slug, link.target_url
        );

        Ok(LinkCreateResult {
            link,
            generated_slug: false,
        })
    }

    async fn create_with_random_slug(&self, target_url: String) -> Result<LinkCreateResult> {
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let link = ShortLink::new(generate_slug(DEFAULT_SLUG_LENGTH), target_url.clone());
            if self.storage.insert_link(&link).await? {
                self.cache.insert(link.clone()).await;
                info!(
                    "LinkService: created link '{}' -> '{}'",
                    link.slug, link.target_url
                );
                return Ok(LinkCreateResult {
                    link,
                    generated_slug: true,
                });
            }
            warn!(
                "Random slug '{}' collided (attempt {}/{}), regenerating",
                link.slug, attempt, MAX_SLUG_ATTEMPTS
            );
        }

        Err(SnaplinkError::storage(format!(
            "Failed to allocate a unique slug after {} attempts",
            MAX_SLUG_ATTEMPTS
        )))
    }

    /// Resolve a slug to its stored link, reading through the cache
    ///
    /// 短链创建后不可变更，缓存回填无一致性问题。
    pub async fn resolve(&self, slug: &str) -> Option<ShortLink> {
        if let Some(link) = self.cache.get(slug).await {
            return Some(link);
        }

        let link = self.storage.get_link(slug).await?;
        self.cache.insert(link.clone()).await;
        Some(link)
    }
}
