//! ClickSink implementation for SeaOrmStorage
//!
//! Every accepted click becomes exactly one row in `click_events`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, EntityTrait};
use tracing::trace;

use super::SeaOrmStorage;
use super::retry;
use crate::analytics::{ClickEvent, ClickSink};

use migration::entities::click_event;

#[async_trait]
impl ClickSink for SeaOrmStorage {
    async fn insert_click_event(&self, event: &ClickEvent) -> anyhow::Result<()> {
        let model = click_event::ActiveModel {
            link_id: Set(event.link_id),
            identity_id: Set(event.identity_id),
            client_hash: Set(event.client_hash.clone()),
            user_agent: Set(event.user_agent.clone()),
            referrer: Set(event.referrer.clone()),
            clicked_at: Set(event.clicked_at),
            ..Default::default()
        };

        let db = &self.db;
        retry::with_retry("insert_click_event", self.retry_config, || async {
            click_event::Entity::insert(model.clone()).exec(db).await
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to insert click event: {}", e))?;

        trace!(
            "Click event written to {} database (link_id={})",
            self.backend_name.to_uppercase(),
            event.link_id
        );
        Ok(())
    }
}
