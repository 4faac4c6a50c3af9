//! HTTP read path.
//!
//! Provides endpoints for:
//! - The page model consumed by the start page
//! - Raw widget snapshots with their fetch time
//! - Triggering an out-of-band refresh
//! - Health and Prometheus metrics
//!
//! Handlers only read cache snapshots and never wait on a provider.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use passport_common::{SiteStatus, WeatherIcon, WeatherReading};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::page::PageModel;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub value: WeatherReading,
    pub icon: Option<WeatherIcon>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub age_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UptimeResponse {
    pub value: Vec<SiteStatus>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub age_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub triggered: Vec<String>,
}

// ============================================================================
// Router
// ============================================================================

/// Create the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/page", get(page_handler))
        .route("/api/weather", get(weather_handler))
        .route("/api/uptime", get(uptime_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/page - Search settings plus the enabled widgets
async fn page_handler(Extension(state): Extension<Arc<AppState>>) -> Json<PageModel> {
    record_request("/api/page");
    Json(PageModel::build(&state))
}

/// GET /api/weather - Current weather snapshot
async fn weather_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    record_request("/api/weather");

    let Some(cache) = &state.weather else {
        return disabled("weather");
    };

    let snapshot = cache.snapshot();
    Json(WeatherResponse {
        icon: WeatherIcon::from_icon_id(&snapshot.value.icon),
        value: snapshot.value.clone(),
        fetched_at: snapshot.fetched_at,
        age_seconds: snapshot.age_secs(Utc::now()),
    })
    .into_response()
}

/// GET /api/uptime - Current monitor snapshot
async fn uptime_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    record_request("/api/uptime");

    let Some(cache) = &state.uptime else {
        return disabled("uptime");
    };

    let snapshot = cache.snapshot();
    Json(UptimeResponse {
        value: snapshot.value.clone(),
        fetched_at: snapshot.fetched_at,
        age_seconds: snapshot.age_secs(Utc::now()),
    })
    .into_response()
}

/// POST /api/refresh - Ask every enabled cache to refresh now
async fn refresh_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    record_request("/api/refresh");

    let triggered: Vec<String> = state
        .trigger_refresh()
        .into_iter()
        .map(str::to_string)
        .collect();

    debug!(caches = ?triggered, "Refresh triggered over HTTP");

    (StatusCode::ACCEPTED, Json(RefreshResponse { triggered }))
}

/// GET /health - Liveness check
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "passport"
    }))
}

/// GET /metrics - Prometheus metrics
async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn record_request(route: &'static str) {
    counter!("passport_http_requests_total", "route" => route).increment(1);
}

fn disabled(widget: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("{} widget is not configured", widget) })),
    )
        .into_response()
}

/// Serve the API on an already bound listener until the server stops.
pub async fn run_server(state: Arc<AppState>, listener: TcpListener) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(address = %listener.local_addr()?, "Starting HTTP server");

    axum::serve(listener, app).await?;

    Ok(())
}
