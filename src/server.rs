use crate::analytics::{self, AnalyticsState};
use crate::auth::{self, AdminSecret, ADMIN_HEADER};
use crate::config::AppConfig;
use crate::content::handler as content_handler;
use crate::content::{ContentState, ContentStore};
use crate::storage;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use deadpool_sqlite::Pool;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub db_ok: bool,
}

/// GET /api/health - Liveness plus a database probe.
pub async fn health(State(pool): State<Arc<Pool>>) -> Json<HealthResponse> {
    let db_ok = storage::sqlite::ping(&pool).await;
    Json(HealthResponse {
        status: if db_ok {
            "ok".into()
        } else {
            "degraded".into()
        },
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        db_ok,
    })
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, String> {
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| format!("invalid CORS origin {o:?}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(ADMIN_HEADER),
        ]))
}

fn timeout_layer(secs: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(secs))
}

/// Build the full `/api` router. Serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()` so the rate
/// limiter can fall back to the peer address.
pub fn build_router(
    config: &AppConfig,
    pool: Pool,
    store: ContentStore,
) -> Result<Router, String> {
    let content_state = ContentState::new(store);
    let analytics_state = Arc::new(AnalyticsState::new(pool.clone(), config.analytics.clone()));
    let admin_secret = AdminSecret(config.auth.admin_password.clone());

    let health_route = Router::new()
        .route("/api/health", get(health))
        .with_state(Arc::new(pool));

    // ── Public content ──
    let content_routes = Router::new()
        .route("/api/content", get(content_handler::get_content))
        .route("/api/content/about", get(content_handler::get_about))
        .route("/api/content/projects", get(content_handler::get_projects))
        .route("/api/content/skills", get(content_handler::get_skills))
        .route("/api/content/contacts", get(content_handler::get_contacts))
        .with_state(content_state.clone());

    // ── Admin content (X-Admin-Password) ──
    let content_admin_routes = Router::new()
        .route("/api/content/about", put(content_handler::update_about))
        .route("/api/content/projects", put(content_handler::update_projects))
        .route("/api/content/skills", put(content_handler::update_skills))
        .route("/api/content/contacts", put(content_handler::update_contacts))
        .layer(middleware::from_fn(auth::require_admin))
        .layer(axum::Extension(admin_secret.clone()))
        .with_state(content_state);

    // ── Tracking (public, rate-limited per client IP) ──
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(config.rate_limit.per_second)
        .burst_size(config.rate_limit.burst_size)
        .finish()
        .ok_or_else(|| "failed to build rate limiter config".to_string())?;

    let track_routes = Router::new()
        .route("/api/analytics/track", post(analytics::handler::track))
        .layer(GovernorLayer::new(governor_conf))
        .with_state(analytics_state.clone());

    // ── Admin analytics ──
    let analytics_routes = Router::new()
        .route("/api/analytics", get(analytics::handler::get_analytics))
        .layer(middleware::from_fn(auth::require_admin))
        .layer(axum::Extension(admin_secret))
        .with_state(analytics_state);

    Ok(Router::new()
        .merge(health_route)
        .merge(content_routes)
        .merge(content_admin_routes)
        .merge(track_routes)
        .merge(analytics_routes)
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.server.cors_origins)?)
                .layer(timeout_layer(config.server.request_timeout_secs)),
        ))
}
