use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::ShortLink;

pub struct StorageFactory;

impl StorageFactory {
    /// 根据数据库配置创建存储实例
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;

        let storage = backend::SeaOrmStorage::new(config, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
