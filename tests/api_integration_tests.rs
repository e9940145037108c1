//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use ttl_cache::{
    api::create_router,
    cache::{ManualClock, TtlPolicy},
    store::{BackingStore, MemoryStore},
    AppState, TtlCache,
};

// == Helper Functions ==

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
}

fn create_test_app_with(policy: TtlPolicy) -> TestApp {
    let store = Arc::new(MemoryStore::ignoring_ttl_hints());
    let clock = Arc::new(ManualClock::default());
    let cache = TtlCache::new(store.clone()).with_clock(clock.clone());
    TestApp {
        router: create_router(AppState::new(cache, policy)),
        store,
        clock,
    }
}

fn create_test_app() -> TestApp {
    create_test_app_with(TtlPolicy::Lenient)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn put(app: &Router, uri: &str, body: &str) -> StatusCode {
    app.clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let status = put(&app.router, "/set?key=test_key", r#"{"hello":"world"}"#).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(app.store.contains_key("test_key"));
}

#[tokio::test]
async fn test_set_missing_key() {
    let app = create_test_app();

    assert_eq!(put(&app.router, "/set", "1").await, StatusCode::BAD_REQUEST);
    assert_eq!(put(&app.router, "/set?key=", "1").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_invalid_json() {
    let app = create_test_app();

    let status = put(&app.router, "/set?key=k", "{invalid json}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_set_empty_body_stores_null() {
    let app = create_test_app();

    assert_eq!(put(&app.router, "/set?key=k", "").await, StatusCode::CREATED);

    let (status, json) = get(&app.router, "/get?key=k").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, Value::Null);
}

#[tokio::test]
async fn test_set_strict_policy_rejects_bad_ttl() {
    let app = create_test_app_with(TtlPolicy::Strict);

    let status = put(&app.router, "/set?key=k&expire=later", "1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_set_lenient_policy_ignores_bad_ttl() {
    let app = create_test_app();

    assert_eq!(
        put(&app.router, "/set?key=k&expire=later", "1").await,
        StatusCode::CREATED
    );
    app.clock.advance(Duration::from_secs(24 * 3600));

    let (status, json) = get(&app.router, "/get?key=k").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!(1));
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();
    let payload = json!({"list": [1, 2, 3], "nested": {"ok": true}, "n": null});

    assert_eq!(
        put(&app.router, "/set?key=get_key", &payload.to_string()).await,
        StatusCode::CREATED
    );

    let (status, json) = get(&app.router, "/get?key=get_key").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, payload);
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let (status, json) = get(&app.router, "/get?key=never-set").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Key not found");
}

#[tokio::test]
async fn test_get_missing_key() {
    let app = create_test_app();

    let (status, json) = get(&app.router, "/get").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("missing key"));
}

#[tokio::test]
async fn test_get_corrupt_entry_is_server_error() {
    let app = create_test_app();
    app.store
        .raw_set("broken", b"\x00\x01 not an entry".to_vec(), None)
        .await
        .unwrap();

    let (status, _) = get(&app.router, "/get?key=broken").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_overwrite_via_api() {
    let app = create_test_app();

    put(&app.router, "/set?key=k&expire=1s", r#""first""#).await;
    put(&app.router, "/set?key=k&expire=1h", r#""second""#).await;
    app.clock.advance(Duration::from_secs(10));

    let (status, json) = get(&app.router, "/get?key=k").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!("second"));
}

// == Expiration Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    assert_eq!(
        put(&app.router, "/set?key=ttl_key&expire=100ms", r#""ttl_value""#).await,
        StatusCode::CREATED
    );

    let (status, json) = get(&app.router, "/get?key=ttl_key").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!("ttl_value"));

    app.clock.advance(Duration::from_millis(100));

    let (status, _) = get(&app.router, "/get?key=ttl_key").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        !app.store.contains_key("ttl_key"),
        "expired read should delete the entry"
    );
}

#[tokio::test]
async fn test_ttl_expiration_real_time() {
    // System clock and a store that honors its TTL hints.
    let store = Arc::new(MemoryStore::new());
    let app = create_router(AppState::new(
        TtlCache::new(store.clone()),
        TtlPolicy::Lenient,
    ));

    put(&app, "/set?key=short&expire=100ms", "true").await;
    assert_eq!(get(&app, "/get?key=short").await.0, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(get(&app, "/get?key=short").await.0, StatusCode::NOT_FOUND);
    assert!(!store.contains_key("short"));
}

#[tokio::test]
async fn test_concurrent_puts_distinct_keys() {
    let app = create_test_app();

    let mut handles = Vec::new();
    for i in 0..32 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            let uri = format!("/set?key=key-{}&expire=1h", i);
            put(&router, &uri, &json!({ "id": i }).to_string()).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    for i in 0..32 {
        let (status, json) = get(&app.router, &format!("/get?key=key-{}", i)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "id": i }));
    }
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = get(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["backend"], "memory");
}

// == End-to-End Over TCP ==

#[tokio::test]
async fn test_end_to_end_over_http() {
    let cache = TtlCache::new(Arc::new(MemoryStore::new()));
    let app = create_router(AppState::new(cache, TtlPolicy::Lenient));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let response = client
        .put(format!("{}/set?key=user:42&expire=1m", base))
        .json(&json!({"name": "Ada", "langs": ["en", "fr"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let response = client
        .get(format!("{}/get", base))
        .query(&[("key", "user:42")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let value: Value = response.json().await.unwrap();
    assert_eq!(value, json!({"name": "Ada", "langs": ["en", "fr"]}));

    let response = client
        .get(format!("{}/get?key=missing", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    server.abort();
}
