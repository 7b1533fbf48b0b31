//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{EntityTrait, QueryOrder};
use tracing::error;

use super::SeaOrmStorage;
use crate::analytics::ClickEvent;
use crate::errors::{Result, SnaplinkError};
use crate::storage::ShortLink;

use migration::entities::{click_event, short_link};

use super::converters::{model_to_event, model_to_link};

impl SeaOrmStorage {
    /// 按 slug 查询短链接，查询失败按未命中处理
    pub async fn get_link(&self, slug: &str) -> Option<ShortLink> {
        match short_link::Entity::find_by_id(slug).one(&self.db).await {
            Ok(model) => model.map(model_to_link),
            Err(e) => {
                error!("查询短链接失败: {}", e);
                None
            }
        }
    }

    /// 全量读取点击事件（分析汇总用）
    pub async fn scan_events(&self) -> Result<Vec<ClickEvent>> {
        let models = click_event::Entity::find()
            .order_by_asc(click_event::Column::ClickedAt)
            .all(&self.db)
            .await
            .map_err(|e| SnaplinkError::storage(format!("读取点击事件失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_event).collect())
    }
}
