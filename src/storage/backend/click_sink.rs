//! ClickSink implementation for SeaOrmStorage
//!
//! This module implements the click event flush functionality.

use async_trait::async_trait;
use sea_orm::EntityTrait;
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::event_to_active_model;
use crate::analytics::{ClickEvent, ClickSink};

use migration::entities::click_event;

#[async_trait]
impl ClickSink for SeaOrmStorage {
    async fn flush_events(&self, events: Vec<ClickEvent>) -> anyhow::Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let total_count = events.len();

        // 构建批量插入的 ActiveModel 列表
        let models: Vec<click_event::ActiveModel> =
            events.iter().map(event_to_active_model).collect();

        // 使用 insert_many 进行批量插入
        click_event::Entity::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to batch insert click events: {}", e))?;

        debug!(
            "Click events written to {} database ({} records)",
            self.backend_name.to_uppercase(),
            total_count
        );

        Ok(())
    }
}
