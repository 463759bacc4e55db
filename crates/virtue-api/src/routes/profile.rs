//! Profile lookup by email.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;

use virtue_core::UserProfile;
use virtue_state::accounts;

use crate::error::ErrorBody;
use crate::response::{ok, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/profile/{email}", get(get_profile))
}

/// GET /api/profile/{email} — Public view of a user.
#[utoipa::path(
    get,
    path = "/api/profile/{email}",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 200, description = "User found", body = UserProfile),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
    tag = "profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<UserProfile> {
    let user = accounts::profile(&state.store, &email)?;
    ok(user.profile())
}
