use axum::extract::State;
use axum::routing::get;
use axum::Router;

use virtue_state::{leaderboard, LeaderboardEntry, UserStore};

use crate::response::{ok, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/leaderboard", get(get_leaderboard))
}

/// GET /api/leaderboard — Top ten non-admin users by credits.
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    responses((status = 200, description = "Ranked users", body = [LeaderboardEntry])),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(State(state): State<AppState>) -> ApiResult<Vec<LeaderboardEntry>> {
    ok(leaderboard(state.store.users()))
}
