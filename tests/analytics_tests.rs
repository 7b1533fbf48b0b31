//! Analytics API 集成测试
//!
//! 覆盖 GET /analytics 的全量汇总：按天点击序列、Top 来源排名、
//! 总点击数，以及重复请求的幂等性。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::NaiveDateTime;
use tempfile::TempDir;

use snaplink::analytics::{ClickEvent, ClickSink};
use snaplink::api::services::analytics_routes;
use snaplink::config::DatabaseConfig;
use snaplink::services::AnalyticsService;
use snaplink::storage::SeaOrmStorage;

// =============================================================================
// 测试环境
// =============================================================================

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("analytics_test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };

    let storage = SeaOrmStorage::new(&config, "sqlite")
        .await
        .expect("Failed to create storage");

    (Arc::new(storage), temp_dir)
}

macro_rules! analytics_app {
    ($storage:expr) => {{
        let service = Arc::new(AnalyticsService::new($storage));

        test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .service(analytics_routes()),
        )
        .await
    }};
}

fn event_at(slug: &str, ts: &str, referrer: Option<&str>) -> ClickEvent {
    ClickEvent {
        slug: slug.to_string(),
        timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc(),
        referrer: referrer.map(|r| r.to_string()),
        user_agent: Some("Mozilla/5.0 (test)".to_string()),
    }
}

/// 直接通过 ClickSink 写入事件，绕过 HTTP 层
async fn seed_events(storage: &Arc<SeaOrmStorage>, events: Vec<ClickEvent>) {
    storage
        .flush_events(events)
        .await
        .expect("Failed to seed click events");
}

macro_rules! fetch_summary {
    ($app:expr) => {{
        let req = TestRequest::get().uri("/analytics").to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        body
    }};
}

// =============================================================================
// Summary Tests
// =============================================================================

#[tokio::test]
async fn test_empty_log_yields_empty_summary() {
    let (storage, _td) = create_temp_storage().await;
    let app = analytics_app!(storage);

    let body = fetch_summary!(&app);
    assert_eq!(body["totalClicks"], 0);
    assert_eq!(body["clicks"].as_array().unwrap().len(), 0);
    assert_eq!(body["topReferrers"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_referrer_ranking_and_total() {
    let (storage, _td) = create_temp_storage().await;

    // R1×3, R2×5, R3×1
    let mut events = Vec::new();
    for _ in 0..3 {
        events.push(event_at("s1", "2026-03-01 10:00:00", Some("https://r1.example/")));
    }
    for _ in 0..5 {
        events.push(event_at("s1", "2026-03-01 11:00:00", Some("https://r2.example/")));
    }
    events.push(event_at("s2", "2026-03-01 12:00:00", Some("https://r3.example/")));
    seed_events(&storage, events).await;

    let app = analytics_app!(storage);
    let body = fetch_summary!(&app);

    assert_eq!(body["totalClicks"], 9);
    let referrers = body["topReferrers"].as_array().unwrap();
    assert_eq!(referrers[0]["referrer"], "https://r2.example/");
    assert_eq!(referrers[0]["count"], 5);
    assert_eq!(referrers[1]["referrer"], "https://r1.example/");
    assert_eq!(referrers[1]["count"], 3);
    assert_eq!(referrers[2]["referrer"], "https://r3.example/");
    assert_eq!(referrers[2]["count"], 1);
}

#[tokio::test]
async fn test_daily_series_ascending() {
    let (storage, _td) = create_temp_storage().await;

    // D1, D1, D2（乱序写入）
    seed_events(
        &storage,
        vec![
            event_at("s1", "2026-03-02 09:00:00", None),
            event_at("s1", "2026-03-01 08:00:00", None),
            event_at("s1", "2026-03-01 20:00:00", None),
        ],
    )
    .await;

    let app = analytics_app!(storage);
    let body = fetch_summary!(&app);

    let clicks = body["clicks"].as_array().unwrap();
    assert_eq!(clicks.len(), 2);
    assert_eq!(clicks[0]["date"], "2026-03-01");
    assert_eq!(clicks[0]["count"], 2);
    assert_eq!(clicks[1]["date"], "2026-03-02");
    assert_eq!(clicks[1]["count"], 1);
}

#[tokio::test]
async fn test_missing_referrer_counted_as_direct() {
    let (storage, _td) = create_temp_storage().await;

    seed_events(
        &storage,
        vec![
            event_at("s1", "2026-03-01 10:00:00", None),
            event_at("s1", "2026-03-01 10:05:00", Some("")),
            event_at("s1", "2026-03-01 10:10:00", Some("https://r1.example/")),
        ],
    )
    .await;

    let app = analytics_app!(storage);
    let body = fetch_summary!(&app);

    let referrers = body["topReferrers"].as_array().unwrap();
    assert_eq!(referrers[0]["referrer"], "Direct");
    assert_eq!(referrers[0]["count"], 2);
}

#[tokio::test]
async fn test_top_referrers_truncated_to_five() {
    let (storage, _td) = create_temp_storage().await;

    let mut events = Vec::new();
    for i in 0..8 {
        // site-00 点 8 次、site-01 点 7 次……保证排名确定
        for _ in 0..(8 - i) {
            events.push(event_at(
                "s1",
                "2026-03-01 10:00:00",
                Some(&format!("https://site-{:02}.example/", i)),
            ));
        }
    }
    seed_events(&storage, events).await;

    let app = analytics_app!(storage);
    let body = fetch_summary!(&app);

    let referrers = body["topReferrers"].as_array().unwrap();
    assert_eq!(referrers.len(), 5);
    assert_eq!(referrers[0]["referrer"], "https://site-00.example/");
    assert_eq!(referrers[4]["referrer"], "https://site-04.example/");
    // 截断只影响排名，总数不受影响
    assert_eq!(body["totalClicks"], (8 + 7 + 6 + 5 + 4 + 3 + 2 + 1));
}

#[tokio::test]
async fn test_repeated_requests_are_idempotent() {
    let (storage, _td) = create_temp_storage().await;

    seed_events(
        &storage,
        vec![
            event_at("s1", "2026-03-01 10:00:00", Some("https://r1.example/")),
            event_at("s1", "2026-03-02 10:00:00", Some("https://r1.example/")),
            event_at("s2", "2026-03-02 11:00:00", None),
        ],
    )
    .await;

    let app = analytics_app!(storage);

    // 无新事件时重复请求必须返回完全相同的结果
    let first = fetch_summary!(&app);
    let second = fetch_summary!(&app);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_analytics_post_not_routed() {
    let (storage, _td) = create_temp_storage().await;
    let app = analytics_app!(storage);

    // Scope 带 GET/HEAD guard，POST 不应命中该路由
    let req = TestRequest::post().uri("/analytics").to_request();
    let resp = test::try_call_service(&app, req).await;
    assert!(resp.is_err() || resp.unwrap().status() == StatusCode::NOT_FOUND);
}
