use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wheeleat_core::spin_log::{NewSpinLog, SpinLog, SpinLogStore, StoreError};
use wheeleat_core::{AppConfig, HostEnvironment, WheelEatApp};

const MANIFEST: &str = include_str!("../../../wheeleat.toml");

fn config() -> AppConfig {
    AppConfig::from_toml_str(MANIFEST).unwrap()
}

// Build the application from the crate under test
fn app() -> Router {
    wheeleat_core::build_app(config()).router()
}

async fn send(router: Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let res = router.oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok_with_cors() {
    let (status, headers, body) = send(app(), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "WheelEat API is running");
    assert_eq!(body["environment"], "local");
    assert!(body["timestamp"].is_string());
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn health_reflects_serverless_environment() {
    let router = WheelEatApp::new(config().with_environment(HostEnvironment::Serverless)).router();
    let (_, _, body) = send(router, get("/api/health")).await;
    assert_eq!(body["environment"], "serverless");
}

#[tokio::test]
async fn malls_lists_known_malls() {
    let (status, _, body) = send(app(), get("/api/malls")).await;
    assert_eq!(status, StatusCode::OK);
    let malls = body["malls"].as_array().unwrap();
    assert_eq!(malls.len(), 1);
    assert_eq!(malls[0]["id"], "sunway_square");
    assert_eq!(malls[0]["name"], "Sunway Square");
    assert_eq!(malls[0]["display_name"], "Sunway Square Mall");
}

#[tokio::test]
async fn categories_default_and_unknown_mall() {
    let (status, _, body) = send(app(), get("/api/categories")).await;
    assert_eq!(status, StatusCode::OK);
    let cats = body["categories"].as_array().unwrap();
    assert!(cats.iter().any(|c| c == "Japanese Cuisine"));

    let (status, _, body) = send(app(), get("/api/categories?mall_id=atlantis")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn restaurants_filter_by_categories() {
    let (status, _, all) = send(app(), get("/api/restaurants")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["count"], 66);

    let (_, _, empty_param) = send(app(), get("/api/restaurants?categories=")).await;
    assert_eq!(empty_param["count"], 66);

    let (_, _, body) = send(
        app(),
        get("/api/restaurants?categories=Fast%20Food,%20Supermarket"),
    )
    .await;
    assert_eq!(body["count"], 3);
    let names: Vec<_> = body["restaurants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Richeese Factory", "Subway", "Village Grocer"]);
    assert_eq!(
        body["restaurants"][1]["logo"],
        "images/logo/subway.png"
    );
}

#[tokio::test]
async fn spin_returns_restaurant_and_records_log() {
    let app = WheelEatApp::new(config());
    let (status, _, body) = send(
        app.router(),
        post_json(
            "/api/spin",
            r#"{"selected_categories":["Fast Food"],"dietary_need":"halal"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Fast Food");
    assert!(body["spin_id"].is_string());
    assert!(body["timestamp"].is_string());
    assert!(body["logo"].is_string());

    let logs = app.store().list().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].id, body["spin_id"].as_str().unwrap());
    assert_eq!(logs[0].dietary_need, "halal");
    assert_eq!(logs[0].mall_id, "sunway_square");
}

#[tokio::test]
async fn spin_validation_errors_use_detail() {
    let cases = [
        ("{oops", "Invalid JSON in request body"),
        ("", "At least one category must be selected"),
        (r#"{"selected_categories":[]}"#, "At least one category must be selected"),
        (
            r#"{"selected_categories":["Moon Food"]}"#,
            "No restaurants found in selected categories",
        ),
    ];
    for (payload, detail) in cases {
        let (status, _, body) = send(app(), post_json("/api/spin", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {:?}", payload);
        assert_eq!(body["detail"], detail);
    }
}

struct BrokenStore;

#[async_trait]
impl SpinLogStore for BrokenStore {
    async fn record(&self, _entry: NewSpinLog) -> Result<SpinLog, StoreError> {
        Err(StoreError::Unavailable("database offline".into()))
    }

    async fn list(&self) -> Result<Vec<SpinLog>, StoreError> {
        Err(StoreError::Unavailable("database offline".into()))
    }
}

#[tokio::test]
async fn spin_survives_store_failure() {
    let router = WheelEatApp::with_store(config(), Arc::new(BrokenStore)).router();
    let (status, _, body) = send(
        router,
        post_json("/api/spin", r#"{"selected_categories":["Supermarket"]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restaurant_name"], "Village Grocer");
    assert!(body["spin_id"].is_null());
}

#[tokio::test]
async fn spin_logs_fail_with_internal_error_when_store_is_down() {
    let router = WheelEatApp::with_store(config(), Arc::new(BrokenStore)).router();
    let (status, _, body) = send(router, get("/api/spin-logs")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].as_str().unwrap().contains("database offline"));
}

#[tokio::test]
async fn spin_logs_summarise_recorded_spins() {
    let app = WheelEatApp::new(config());
    for cat in ["Supermarket", "Supermarket", "Fast Food"] {
        let payload = format!(r#"{{"selected_categories":["{}"]}}"#, cat);
        let (status, _, _) = send(app.router(), post_json("/api/spin", &payload)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _, body) = send(app.router(), get("/api/spin-logs?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["summary"]["total_spins"], 3);
    assert!(body["filters"]["date"].is_null());
    assert!(body["filters"].get("limit").is_none());
    let stats = &body["statistics"];
    assert_eq!(stats["spins_by_category"][0]["category"], "Supermarket");
    assert_eq!(stats["spins_by_category"][0]["count"], 2);
    assert_eq!(stats["spins_by_restaurant"][0]["restaurant_name"], "Village Grocer");
    assert_eq!(stats["spins_by_mall"][0]["mall_id"], "sunway_square");
    assert_eq!(stats["daily_spins"].as_array().unwrap().len(), 1);
    assert_eq!(stats["recent_spins"].as_array().unwrap().len(), 2);

    let (_, _, filtered) = send(
        app.router(),
        get("/api/spin-logs?category=Fast%20Food&restaurant_name=sub"),
    )
    .await;
    assert_eq!(filtered["filters"]["category"], "Fast Food");
    // Fast Food is Richeese Factory or Subway; only Subway matches "sub"
    let n = filtered["summary"]["total_spins"].as_u64().unwrap();
    assert!(n <= 1);
}

#[tokio::test]
async fn spin_logs_reject_bad_dates() {
    let (status, _, body) = send(app(), get("/api/spin-logs?date=yesterday")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("YYYY-MM-DD"));
}

#[tokio::test]
async fn spin_logs_reject_out_of_range_numbers() {
    for uri in [
        "/api/spin-logs?days=4000000000",
        "/api/spin-logs?days=0",
        "/api/spin-logs?limit=99999999999999999999999",
    ] {
        let (status, headers, body) = send(app(), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(body["detail"].is_string(), "{}", uri);
    }

    let (status, _, body) = send(app(), get("/api/spin-logs?days=3650")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn wrong_method_is_405_json() {
    let (status, headers, body) = send(app(), post_json("/api/health", "{}")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");

    let (status, _, _) = send(app(), get("/api/spin")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let (status, _, body) = send(app(), get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn options_preflight_is_empty_200_with_cors() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/spin")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type, Authorization"
    );
    assert_eq!(headers.get("access-control-max-age").unwrap(), "86400");
}
