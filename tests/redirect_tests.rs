//! Redirect endpoint tests
//!
//! Full HTTP path: actix routes → resolver → SQLite store → click pipeline.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use sea_orm::{EntityTrait, PaginatorTrait};
use tempfile::TempDir;

use golink::analytics::{ClickPipeline, hash_client};
use golink::api::services::{AppStartTime, RedirectContext};
use golink::config::{DatabaseConfig, StaticConfig};
use golink::metrics_core::NoopMetrics;
use golink::runtime::modes::server::configure_routes;
use golink::services::{ResolverCore, ResolverSettings};
use golink::storage::{NewLink, Role, SeaOrmStorage, StorageFactory, Visibility};
use migration::entities::click_event;

// =============================================================================
// Test Setup
// =============================================================================

struct TestEnv {
    _dir: TempDir,
    storage: Arc<SeaOrmStorage>,
    pipeline: ClickPipeline,
    ctx: web::Data<RedirectContext>,
    grantee_id: i64,
    stranger_id: i64,
}

async fn setup() -> TestEnv {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("redirect_test.db");
    let database = DatabaseConfig {
        database_url: format!("sqlite://{}", db_path.display()),
        ..DatabaseConfig::default()
    };
    let storage = StorageFactory::create(&database)
        .await
        .expect("Failed to create storage");

    let owner = storage.insert_identity("owner", Role::Member).await.unwrap();
    let grantee = storage.insert_identity("grantee", Role::Member).await.unwrap();
    let stranger = storage.insert_identity("stranger", Role::Member).await.unwrap();

    storage
        .insert_link(NewLink::new("docs", "https://wiki.example.com"))
        .await
        .unwrap();
    storage
        .insert_link(NewLink::new("gh", "https://github.com/$user"))
        .await
        .unwrap();
    let finance = storage
        .insert_link(
            NewLink::new("finance", "https://finance.example.com")
                .with_visibility(Visibility::Secure)
                .with_owner(owner.id),
        )
        .await
        .unwrap();
    storage
        .grant_share(finance.id, grantee.id, Some(owner.id))
        .await
        .unwrap();

    let mut config = StaticConfig::default();
    config.auth.trust_identity_headers = true;
    config.server.trusted_proxies = vec!["10.0.0.0/8".to_string()];
    config.resolver.default_url = "https://intranet.example.com".to_string();

    let pipeline = ClickPipeline::start(256, storage.clone(), NoopMetrics::arc());
    let resolver = Arc::new(ResolverCore::new(
        storage.clone(),
        pipeline.recorder(),
        NoopMetrics::arc(),
        ResolverSettings::from_config(&config.resolver, &config.clicks),
    ));
    let ctx = web::Data::new(RedirectContext::new(resolver, &config));

    TestEnv {
        _dir: dir,
        storage,
        pipeline,
        ctx,
        grantee_id: grantee.id,
        stranger_id: stranger.id,
    }
}

macro_rules! app {
    ($env:expr) => {
        test::init_service(
            App::new()
                .app_data($env.ctx.clone())
                .app_data(web::Data::new(AppStartTime::now()))
                .configure(|cfg| configure_routes(cfg, "/metrics")),
        )
        .await
    };
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[actix_rt::test]
async fn test_static_redirect_ignores_remainder() {
    let env = setup().await;
    let app = app!(env);

    let req = TestRequest::get().uri("/docs/anything").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://wiki.example.com");
}

#[actix_rt::test]
async fn test_template_redirect() {
    let env = setup().await;
    let app = app!(env);

    let req = TestRequest::get().uri("/gh/octocat").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://github.com/octocat");
}

#[actix_rt::test]
async fn test_encoded_slash_is_one_template_argument() {
    let env = setup().await;
    let app = app!(env);

    let req = TestRequest::get().uri("/gh/a%2Fb").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://github.com/a%2Fb");
}

#[actix_rt::test]
async fn test_static_redirect_with_many_segments() {
    let env = setup().await;
    let app = app!(env);

    // 默认 max_segments = 16，这里 17 段
    let uri = format!("/docs{}", "/x".repeat(16));
    let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://wiki.example.com");
}

#[actix_rt::test]
async fn test_not_found_is_indistinguishable() {
    let env = setup().await;
    let app = app!(env);

    let arity = test::call_service(
        &app,
        TestRequest::get().uri("/gh/octocat/extra").to_request(),
    )
    .await;
    assert_eq!(arity.status(), StatusCode::NOT_FOUND);
    let arity_body = test::read_body(arity).await;

    let missing = test::call_service(&app, TestRequest::get().uri("/nope").to_request()).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let missing_body = test::read_body(missing).await;

    assert_eq!(arity_body, missing_body);
}

#[actix_rt::test]
async fn test_secure_link_anonymous_redirects_to_login() {
    let env = setup().await;
    let app = app!(env);

    let req = TestRequest::get().uri("/finance").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/.auth/login?next=%2Ffinance");
}

#[actix_rt::test]
async fn test_secure_link_with_identity_headers() {
    let env = setup().await;
    let app = app!(env);

    let grantee = TestRequest::get()
        .uri("/finance")
        .insert_header(("X-Auth-User-Id", env.grantee_id.to_string()))
        .insert_header(("X-Auth-User", "grantee"))
        .to_request();
    let resp = test::call_service(&app, grantee).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://finance.example.com");

    let stranger = TestRequest::get()
        .uri("/finance")
        .insert_header(("X-Auth-User-Id", env.stranger_id.to_string()))
        .insert_header(("X-Auth-User", "stranger"))
        .to_request();
    let resp = test::call_service(&app, stranger).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let admin = TestRequest::get()
        .uri("/finance")
        .insert_header(("X-Auth-User-Id", env.stranger_id.to_string()))
        .insert_header(("X-Auth-Role", "admin"))
        .to_request();
    let resp = test::call_service(&app, admin).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[actix_rt::test]
async fn test_landing_redirect() {
    let env = setup().await;
    let app = app!(env);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://intranet.example.com");
}

#[actix_rt::test]
async fn test_named_routes_take_precedence() {
    let env = setup().await;
    env.storage
        .insert_link(NewLink::new("health/live", "https://shadowed.example.com"))
        .await
        .unwrap();
    env.storage
        .insert_link(NewLink::new("health", "https://benefits.example.com"))
        .await
        .unwrap();
    let app = app!(env);

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // 其余路径不受 health 路由影响
    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://benefits.example.com");
}

#[actix_rt::test]
async fn test_head_request_redirects() {
    let env = setup().await;
    let app = app!(env);

    let req = TestRequest::default()
        .method(actix_web::http::Method::HEAD)
        .uri("/docs")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "https://wiki.example.com");

    // HEAD 不计入点击
    let report = env.pipeline.shutdown(Duration::from_secs(5)).await;
    assert_eq!(report.stats.accepted, 0);
    assert_eq!(
        click_event::Entity::find()
            .count(env.storage.get_db())
            .await
            .unwrap(),
        0
    );
}

#[actix_rt::test]
async fn test_redirect_records_privacy_reduced_click() {
    let env = setup().await;
    let app = app!(env);

    let req = TestRequest::get()
        .uri("/docs")
        .peer_addr("10.1.2.3:5555".parse().unwrap())
        .insert_header(("X-Forwarded-For", "198.51.100.1, 10.1.2.3"))
        .insert_header(("User-Agent", "Mozilla/5.0"))
        .insert_header(("Referer", "https://chat.example.com/room"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    // 未命中与需要登录的请求不产生点击
    test::call_service(&app, TestRequest::get().uri("/nope").to_request()).await;
    test::call_service(&app, TestRequest::get().uri("/finance").to_request()).await;

    let report = env.pipeline.shutdown(Duration::from_secs(5)).await;
    assert_eq!(report.stats.persisted, 1);

    let db = env.storage.get_db();
    assert_eq!(click_event::Entity::find().count(db).await.unwrap(), 1);

    let row = click_event::Entity::find()
        .one(db)
        .await
        .unwrap()
        .expect("click row");
    assert_eq!(row.identity_id, None);
    assert_eq!(row.user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(row.referrer.as_deref(), Some("https://chat.example.com/room"));
    assert_eq!(
        row.client_hash,
        Some(hash_client("198.51.100.1", row.clicked_at))
    );
}
