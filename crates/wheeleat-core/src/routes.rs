use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::app::WheelEatApp;
use crate::catalog::{self, MallInfo};
use crate::config::HostEnvironment;
use crate::error::ApiError;
use crate::spin::{spin, SpinRequest, SpinResult, NO_CATEGORY_SELECTED};
use crate::spin_log::{NewSpinLog, SpinLogFilter, SpinLogQuery, SpinLogStats};

const CORS_HEADERS: [(&str, &str); 4] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type, Authorization"),
    ("access-control-max-age", "86400"),
];

fn apply_cors_headers(headers: &mut HeaderMap) {
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

/// Answers every preflight directly and stamps CORS headers on everything else.
async fn cors(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut res = StatusCode::OK.into_response();
        apply_cors_headers(res.headers_mut());
        return res;
    }
    let mut res = next.run(req).await;
    apply_cors_headers(res.headers_mut());
    res
}

async fn request_logger(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();
    let res = next.run(req).await;
    log::info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        res.status().as_u16(),
        started.elapsed().as_millis()
    );
    res
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn mall_or_default<'a>(mall_id: Option<&'a str>, default_mall: &'a str) -> &'a str {
    match mall_id.map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => default_mall,
    }
}

/// Split a comma separated `categories` parameter; `None` when absent or blank.
fn parse_categories(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(raw.split(',').map(|c| c.trim().to_string()).collect())
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: String,
    timestamp: DateTime<Utc>,
    environment: HostEnvironment,
    version: &'static str,
}

pub async fn handle_health(State(app): State<WheelEatApp>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        message: format!("{} API is running", app.config().app.name),
        timestamp: Utc::now(),
        environment: app.environment(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
struct MallEntry {
    id: &'static str,
    #[serde(flatten)]
    info: MallInfo,
}

pub async fn handle_malls() -> impl IntoResponse {
    let malls: Vec<MallEntry> = catalog::available_malls()
        .into_iter()
        .map(|id| MallEntry {
            id,
            info: catalog::mall_info(id),
        })
        .collect();
    Json(json!({ "malls": malls }))
}

#[derive(Debug, Default, Deserialize)]
pub struct MallQuery {
    pub mall_id: Option<String>,
}

pub async fn handle_categories(
    State(app): State<WheelEatApp>,
    Query(q): Query<MallQuery>,
) -> impl IntoResponse {
    let mall = mall_or_default(q.mall_id.as_deref(), &app.config().app.default_mall);
    Json(json!({ "categories": catalog::all_categories(mall) }))
}

#[derive(Debug, Default, Deserialize)]
pub struct RestaurantsQuery {
    pub categories: Option<String>,
    pub mall_id: Option<String>,
}

pub async fn handle_restaurants(
    State(app): State<WheelEatApp>,
    Query(q): Query<RestaurantsQuery>,
) -> impl IntoResponse {
    let mall = mall_or_default(q.mall_id.as_deref(), &app.config().app.default_mall);
    let restaurants = match parse_categories(q.categories.as_deref()) {
        Some(categories) => catalog::restaurants_by_categories(&categories, mall),
        None => catalog::all_restaurants(mall),
    };
    let count = restaurants.len();
    Json(json!({ "restaurants": restaurants, "count": count }))
}

fn parse_spin_request(body: &[u8]) -> Result<SpinRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request(NO_CATEGORY_SELECTED));
    }
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        log::warn!("spin: invalid JSON: {}", e);
        ApiError::bad_request("Invalid JSON in request body")
    })?;
    if !value.is_object() {
        return Err(ApiError::bad_request(NO_CATEGORY_SELECTED));
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("Invalid spin request: {}", e)))
}

pub async fn handle_spin(
    State(app): State<WheelEatApp>,
    body: Bytes,
) -> Result<Json<SpinResult>, ApiError> {
    let req = parse_spin_request(&body)?;
    let default_mall = &app.config().app.default_mall;
    let mall = req.mall(default_mall).to_string();
    let restaurant = {
        let mut rng = rand::thread_rng();
        spin(&req, default_mall, &mut rng)?
    };

    let entry = NewSpinLog {
        restaurant_name: restaurant.name.clone(),
        restaurant_unit: restaurant.unit.clone(),
        restaurant_floor: restaurant.floor.clone(),
        category: restaurant.category.clone(),
        dietary_need: req.dietary_need().to_string(),
        mall_id: mall,
        selected_categories: req.selected_categories.clone(),
        timestamp: Utc::now(),
    };
    let fallback_ts = entry.timestamp;

    // A spin is still a spin when it can't be recorded.
    let result = match app.store().record(entry).await {
        Ok(logged) => SpinResult::new(restaurant, logged.timestamp, Some(logged.id)),
        Err(e) => {
            log::error!("spin log insert failed: {}", e);
            SpinResult::new(restaurant, fallback_ts, None)
        }
    };
    log::info!(
        "spin mall={} -> {} ({})",
        req.mall(default_mall),
        result.restaurant_name,
        result.category
    );
    Ok(Json(result))
}

pub async fn handle_spin_logs(
    State(app): State<WheelEatApp>,
    Query(query): Query<SpinLogQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = SpinLogFilter::from_query(&query, &app.config().spin_logs, Utc::now())?;
    let logs = app
        .store()
        .list()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let stats = SpinLogStats::compute(&logs, &filter);
    Ok(Json(json!({
        "success": true,
        "filters": query,
        "summary": stats.summary,
        "statistics": stats.statistics,
    })))
}

pub fn build_router(app: WheelEatApp) -> Router {
    Router::new()
        .route("/api/health", get(handle_health).fallback(method_not_allowed))
        .route("/api/malls", get(handle_malls).fallback(method_not_allowed))
        .route(
            "/api/categories",
            get(handle_categories).fallback(method_not_allowed),
        )
        .route(
            "/api/restaurants",
            get(handle_restaurants).fallback(method_not_allowed),
        )
        .route("/api/spin", post(handle_spin).fallback(method_not_allowed))
        .route(
            "/api/spin-logs",
            get(handle_spin_logs).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn(request_logger))
        .with_state(app)
}
