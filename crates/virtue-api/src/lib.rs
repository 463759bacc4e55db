//! # virtue-api — HTTP Service for VirtueVerse
//!
//! ## API Surface
//!
//! | Prefix                  | Module                    | Auth         |
//! |-------------------------|---------------------------|--------------|
//! | `/api/auth/*`           | [`routes::auth`]          | none         |
//! | `/api/profile/*`        | [`routes::profile`]       | none         |
//! | `/api/deeds*`           | [`routes::deeds`]         | none         |
//! | `/api/leaderboard`      | [`routes::leaderboard`]   | none         |
//! | `/api/admin/*`          | [`routes::admin`]         | admin bearer |
//! | `/health/*`, `/metrics` | this module               | none         |
//! | `/openapi.json`         | [`openapi`]               | none         |
//!
//! ## Middleware Stack (outermost first)
//!
//! ```text
//! CorsLayer → TraceLayer → MetricsMiddleware → [AdminAuth] → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, StatusCode};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use virtue_state::CatalogStore;

use crate::middleware::metrics::ApiMetrics;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Request body limit for all JSON routes.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Assemble the application router.
///
/// Health probes and `/metrics` are mounted outside the admin auth layer.
pub fn app(state: AppState) -> Router {
    let metrics = if state.config.metrics_enabled {
        match ApiMetrics::new() {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::error!(error = %e, "failed to build metrics registry; metrics disabled");
                None
            }
        }
    } else {
        None
    };

    let admin = routes::admin::router().layer(from_fn_with_state(
        state.clone(),
        auth::admin_auth_middleware,
    ));

    let mut api = Router::new()
        .merge(routes::auth::router())
        .merge(routes::profile::router())
        .merge(routes::deeds::router())
        .merge(routes::leaderboard::router())
        .merge(admin)
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    let mut unauthenticated = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if let Some(metrics) = metrics {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
        unauthenticated = unauthenticated
            .route("/metrics", get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    Router::new()
        .merge(unauthenticated)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /metrics — Prometheus scrape endpoint.
///
/// Domain gauges are refreshed from the store on each scrape.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    metrics.observe_store(&state.store);
    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe: 200 while the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the deed catalog is loaded.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.store.catalog().is_empty() {
        return (StatusCode::SERVICE_UNAVAILABLE, "catalog not loaded").into_response();
    }
    (StatusCode::OK, "ready").into_response()
}
