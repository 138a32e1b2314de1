//! Write operations for SeaOrmStorage
//!
//! Links, identities and share grants are managed outside the resolver;
//! these helpers seed them (fixtures, benches, provisioning scripts).

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use tracing::info;

use super::SeaOrmStorage;
use crate::errors::{GolinkError, Result};
use crate::storage::models::{NewLink, Role};
use crate::storage::{Identity, Link};

use super::converters::{model_to_identity, model_to_link};
use migration::entities::{identity, link, share_grant};

impl SeaOrmStorage {
    pub async fn insert_link(&self, new_link: NewLink) -> Result<Link> {
        if new_link.slug.is_empty() {
            return Err(GolinkError::validation("slug must not be empty"));
        }

        let co_owner_ids = if new_link.co_owner_ids.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&new_link.co_owner_ids).map_err(|e| {
                GolinkError::validation(format!("Cannot encode co_owner_ids: {}", e))
            })?)
        };

        let now = Utc::now();
        let model = link::ActiveModel {
            slug: Set(new_link.slug),
            url_template: Set(new_link.url_template),
            visibility: Set(new_link.visibility.as_ref().to_string()),
            owner_id: Set(new_link.owner_id),
            co_owner_ids: Set(co_owner_ids),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        info!("Link '{}' created (id={})", saved.slug, saved.id);
        Ok(model_to_link(saved))
    }

    pub async fn insert_identity(&self, username: &str, role: Role) -> Result<Identity> {
        let model = identity::ActiveModel {
            username: Set(username.to_string()),
            role: Set(role.as_ref().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        Ok(model_to_identity(saved))
    }

    pub async fn grant_share(
        &self,
        link_id: i64,
        identity_id: i64,
        granted_by: Option<i64>,
    ) -> Result<()> {
        let model = share_grant::ActiveModel {
            link_id: Set(link_id),
            identity_id: Set(identity_id),
            granted_by: Set(granted_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model.insert(&self.db).await?;
        info!(
            "Share grant added: link_id={} identity_id={}",
            link_id, identity_id
        );
        Ok(())
    }
}
