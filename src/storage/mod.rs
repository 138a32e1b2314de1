use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{Identity, Link, NewLink, Role, StorageConfig, Visibility};

/// Read-side store contract used by the resolver and the gauge refresher.
///
/// `find_link_by_slug` returns `Ok(None)` for "no such slug"; every other
/// failure is an `Err` and makes the caller fail closed.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Exact, indexed lookup of a slug (may contain `/`).
    async fn find_link_by_slug(&self, slug: &str) -> Result<Option<Link>>;

    /// Whether `identity_id` holds a share grant on `link_id`.
    async fn has_share_grant(&self, link_id: i64, identity_id: i64) -> Result<bool>;

    async fn count_links(&self) -> Result<u64>;

    async fn count_identities(&self) -> Result<u64>;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;

        let storage = SeaOrmStorage::new(config, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
