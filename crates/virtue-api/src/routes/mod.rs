//! # Route Modules
//!
//! One module per resource. Each exposes `router()` returning a
//! `Router<AppState>`; [`crate::app`] merges them and applies middleware.

pub mod admin;
pub mod auth;
pub mod deeds;
pub mod leaderboard;
pub mod profile;

use crate::error::AppError;

/// Run CPU-heavy work (password hashing) off the async executor.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))
}
