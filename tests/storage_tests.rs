//! SeaORM storage tests (SQLite)

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, ModelTrait, PaginatorTrait};
use tempfile::TempDir;

use golink::analytics::{ClickEvent, ClickSink};
use golink::config::DatabaseConfig;
use golink::storage::backend::infer_backend_from_url;
use golink::storage::{LinkRepository, NewLink, Role, SeaOrmStorage, StorageFactory, Visibility};
use migration::entities::{click_event, link, share_grant};

async fn storage() -> (TempDir, std::sync::Arc<SeaOrmStorage>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let database = DatabaseConfig {
        database_url: format!("sqlite://{}", dir.path().join("storage.db").display()),
        ..DatabaseConfig::default()
    };
    let storage = StorageFactory::create(&database)
        .await
        .expect("Failed to create storage");
    (dir, storage)
}

#[tokio::test]
async fn test_backend_inference() {
    assert_eq!(infer_backend_from_url("sqlite://x.db").unwrap(), "sqlite");
    assert_eq!(infer_backend_from_url("postgres://h/db").unwrap(), "postgres");
    assert!(infer_backend_from_url("ftp://nowhere").is_err());
}

#[tokio::test]
async fn test_find_link_by_multi_segment_slug() {
    let (_dir, storage) = storage().await;
    let created = storage
        .insert_link(
            NewLink::new("team/roadmap", "https://docs.example.com/roadmap")
                .with_visibility(Visibility::Private)
                .with_owner(7)
                .with_co_owners(vec![8, 9]),
        )
        .await
        .unwrap();

    let found = storage
        .find_link_by_slug("team/roadmap")
        .await
        .unwrap()
        .expect("link should exist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.visibility, Visibility::Private);
    assert_eq!(found.owner_id, Some(7));
    assert_eq!(found.co_owner_ids, vec![8, 9]);

    assert!(storage.find_link_by_slug("team").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_stored_visibility_reads_as_secure() {
    let (_dir, storage) = storage().await;
    let now = Utc::now();
    link::ActiveModel {
        slug: Set("legacy".to_string()),
        url_template: Set("https://legacy.example.com".to_string()),
        visibility: Set("internal".to_string()),
        owner_id: Set(None),
        co_owner_ids: Set(Some("not-json".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(storage.get_db())
    .await
    .unwrap();

    let found = storage.find_link_by_slug("legacy").await.unwrap().unwrap();
    assert_eq!(found.visibility, Visibility::Secure);
    assert!(found.co_owner_ids.is_empty());
}

#[tokio::test]
async fn test_share_grants_and_counts() {
    let (_dir, storage) = storage().await;
    let alice = storage.insert_identity("alice", Role::Member).await.unwrap();
    let bob = storage.insert_identity("bob", Role::Admin).await.unwrap();
    let secret = storage
        .insert_link(NewLink::new("secret", "https://s.example.com").with_visibility(Visibility::Secure))
        .await
        .unwrap();
    storage
        .insert_link(NewLink::new("open", "https://o.example.com"))
        .await
        .unwrap();

    storage.grant_share(secret.id, alice.id, Some(bob.id)).await.unwrap();

    assert!(storage.has_share_grant(secret.id, alice.id).await.unwrap());
    assert!(!storage.has_share_grant(secret.id, bob.id).await.unwrap());
    assert_eq!(storage.count_links().await.unwrap(), 2);
    assert_eq!(storage.count_identities().await.unwrap(), 2);
}

#[tokio::test]
async fn test_duplicate_slug_is_rejected() {
    let (_dir, storage) = storage().await;
    storage
        .insert_link(NewLink::new("docs", "https://a.example.com"))
        .await
        .unwrap();
    let err = storage
        .insert_link(NewLink::new("docs", "https://b.example.com"))
        .await
        .unwrap_err();
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn test_grants_cascade_with_link() {
    let (_dir, storage) = storage().await;
    let alice = storage.insert_identity("alice", Role::Member).await.unwrap();
    let secret = storage
        .insert_link(NewLink::new("secret", "https://s.example.com").with_visibility(Visibility::Secure))
        .await
        .unwrap();
    storage.grant_share(secret.id, alice.id, None).await.unwrap();

    let db = storage.get_db();
    let model = link::Entity::find_by_id(secret.id).one(db).await.unwrap().unwrap();
    model.delete(db).await.unwrap();

    assert_eq!(share_grant::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_insert_click_event() {
    let (_dir, storage) = storage().await;
    let docs = storage
        .insert_link(NewLink::new("docs", "https://wiki.example.com"))
        .await
        .unwrap();

    let event = ClickEvent {
        link_id: docs.id,
        identity_id: Some(3),
        client_hash: Some("ab".repeat(32)),
        user_agent: Some("curl/8.0".to_string()),
        referrer: None,
        clicked_at: Utc::now(),
    };
    storage.insert_click_event(&event).await.unwrap();
    storage.insert_click_event(&event).await.unwrap();

    let rows = click_event::Entity::find().all(storage.get_db()).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].link_id, docs.id);
    assert_eq!(rows[0].identity_id, Some(3));
    assert_eq!(rows[0].client_hash, event.client_hash);
}
