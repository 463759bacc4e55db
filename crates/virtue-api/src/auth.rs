//! # Admin Authentication
//!
//! Bearer token middleware for `/api/admin/*`.
//!
//! When no admin token is configured every request passes (development
//! mode). Otherwise the request must carry `Authorization: Bearer <token>`
//! matching the configured token; the comparison is constant time.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

/// Constant-time comparison of bearer tokens.
///
/// On a length mismatch a dummy comparison still runs so timing does not
/// reveal the expected length.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Reject admin requests without a valid bearer token.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.admin_token.as_ref() else {
        return next.run(request).await;
    };

    match request.headers().typed_get::<Authorization<Bearer>>() {
        Some(Authorization(bearer)) if constant_time_token_eq(bearer.token(), expected.expose()) => {
            next.run(request).await
        }
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "admin authentication failed: invalid bearer token");
            AppError::Unauthorized("invalid bearer token".to_string()).into_response()
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "admin authentication failed: missing bearer token");
            AppError::Unauthorized("missing bearer token".to_string()).into_response()
        }
    }
}
