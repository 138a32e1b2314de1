//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::{debug, error};

use super::SeaOrmStorage;
use super::converters::model_to_link;
use super::retry;
use crate::errors::Result;
use crate::storage::{LinkRepository, Link};

use migration::entities::{identity, link, share_grant};

#[async_trait]
impl LinkRepository for SeaOrmStorage {
    async fn find_link_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        let db = &self.db;

        let result = retry::with_retry("find_link_by_slug", self.retry_config, || async {
            link::Entity::find()
                .filter(link::Column::Slug.eq(slug))
                .one(db)
                .await
        })
        .await;

        match result {
            Ok(model) => Ok(model.map(model_to_link)),
            Err(e) => {
                error!("查询链接失败（重试后仍失败）: {}", e);
                Err(e.into())
            }
        }
    }

    async fn has_share_grant(&self, link_id: i64, identity_id: i64) -> Result<bool> {
        let db = &self.db;

        let count = retry::with_retry("has_share_grant", self.retry_config, || async {
            share_grant::Entity::find()
                .filter(share_grant::Column::LinkId.eq(link_id))
                .filter(share_grant::Column::IdentityId.eq(identity_id))
                .count(db)
                .await
        })
        .await?;

        debug!(
            "Share grant check link_id={} identity_id={}: {}",
            link_id,
            identity_id,
            count > 0
        );
        Ok(count > 0)
    }

    async fn count_links(&self) -> Result<u64> {
        let db = &self.db;
        let count = retry::with_retry("count_links", self.retry_config, || async {
            link::Entity::find().count(db).await
        })
        .await?;
        Ok(count)
    }

    async fn count_identities(&self) -> Result<u64> {
        let db = &self.db;
        let count = retry::with_retry("count_identities", self.retry_config, || async {
            identity::Entity::find().count(db).await
        })
        .await?;
        Ok(count)
    }
}
