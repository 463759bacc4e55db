//! # Account API
//!
//! Signup and login. Both return the public user view; there are no
//! session tokens, the client keeps the profile it gets back.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use virtue_core::UserProfile;
use virtue_state::accounts::{self, Signup};

use super::run_blocking;
use crate::error::ErrorBody;
use crate::extractors::extract_json;
use crate::response::{ok, ApiResult};
use crate::state::AppState;

/// Signup form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
}

/// POST /api/auth/signup — Create a user account.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = UserProfile),
        (status = 400, description = "Missing fields or email already registered", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let req = extract_json(body)?;
    let user = run_blocking(move || {
        accounts::signup(
            &state.store,
            &state.passwords,
            Signup {
                name: req.name.as_deref(),
                email: req.email.as_deref(),
                password: req.password.as_deref(),
            },
        )
    })
    .await??;
    ok(user.profile())
}

/// POST /api/auth/login — Check credentials.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserProfile),
        (status = 400, description = "Missing fields or wrong password", body = ErrorBody),
        (status = 404, description = "Unknown email", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let req = extract_json(body)?;
    let user = run_blocking(move || {
        accounts::login(
            &state.store,
            &state.passwords,
            req.email.as_deref(),
            req.password.as_deref(),
        )
    })
    .await??;
    tracing::debug!(user_id = %user.id, "login");
    ok(user.profile())
}
