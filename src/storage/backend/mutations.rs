//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use sea_orm::{DbErr, EntityTrait, SqlErr};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::link_to_active_model;
use crate::errors::{Result, SnaplinkError};
use crate::storage::ShortLink;

use migration::entities::short_link;

/// 唯一约束冲突判定
fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl SeaOrmStorage {
    /// 插入新短链接
    ///
    /// 映射创建后不可变更，slug 已被占用时返回 Ok(false)，不覆盖已有记录。
    pub async fn insert_link(&self, link: &ShortLink) -> Result<bool> {
        let model = link_to_active_model(link);

        match short_link::Entity::insert(model).exec(&self.db).await {
            Ok(_) => {
                info!("Short link created: {} -> {}", link.slug, link.target_url);
                Ok(true)
            }
            Err(e) if is_unique_violation(&e) => {
                debug!("Slug already taken: {}", link.slug);
                Ok(false)
            }
            Err(e) => Err(SnaplinkError::storage(format!(
                "插入短链接失败 {}: {}",
                link.slug, e
            ))),
        }
    }
}
