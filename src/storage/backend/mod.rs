//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod click_sink;
mod connection;
mod converters;
mod mutations;
mod query;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::analytics::ClickSink;
use crate::config::DatabaseConfig;
use crate::errors::{Result, SnaplinkError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{event_to_active_model, link_to_active_model, model_to_event, model_to_link};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(SnaplinkError::config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        if config.database_url.is_empty() {
            return Err(SnaplinkError::config("DATABASE_URL 未设置".to_string()));
        }

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(&config.database_url).await?
        } else {
            connect_generic(config, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
        };

        // 运行迁移
        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 后端类型名称（sqlite / mysql / postgres）
    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 存活检查（健康检查接口使用）
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| SnaplinkError::storage(format!("数据库连接检查失败: {}", e)))
    }

    pub fn as_click_sink(&self) -> Arc<dyn ClickSink> {
        Arc::new(self.clone()) as Arc<dyn ClickSink>
    }

    /// 获取数据库连接（用于测试和诊断等需要直接访问数据库的场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
