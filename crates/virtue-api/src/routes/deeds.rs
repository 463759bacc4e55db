//! # Deeds API
//!
//! Catalog listing, deed submission, and per-user deed history.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use virtue_core::{DeedCatalogItem, UserId};
use virtue_state::{submit_deed, user_deeds, CatalogStore, Deed, DeedForm};

use crate::error::ErrorBody;
use crate::extractors::extract_json;
use crate::response::{ok, ApiResult};
use crate::state::AppState;

/// Deed submission form.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDeedRequest {
    pub user_id: Option<String>,
    /// Free-text deed type, normally a catalog title.
    pub deed_type: Option<String>,
    pub description: Option<String>,
    pub proof_url: Option<String>,
    /// Catalog entry the user picked, if any.
    pub catalog_item_id: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/deeds", post(create_deed))
        .route("/api/deeds/catalog", get(list_catalog))
        .route("/api/deeds/{userId}", get(list_user_deeds))
}

/// GET /api/deeds/catalog — The static deed catalog.
#[utoipa::path(
    get,
    path = "/api/deeds/catalog",
    responses((status = 200, description = "Catalog items", body = [DeedCatalogItem])),
    tag = "deeds"
)]
pub async fn list_catalog(State(state): State<AppState>) -> ApiResult<Vec<DeedCatalogItem>> {
    ok(state.store.catalog())
}

/// POST /api/deeds — Submit a deed for review.
#[utoipa::path(
    post,
    path = "/api/deeds",
    request_body = SubmitDeedRequest,
    responses(
        (status = 200, description = "Deed recorded as pending", body = Deed),
        (status = 400, description = "Missing fields or unknown catalog item", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
    tag = "deeds"
)]
pub async fn create_deed(
    State(state): State<AppState>,
    body: Result<Json<SubmitDeedRequest>, JsonRejection>,
) -> ApiResult<Deed> {
    let req = extract_json(body)?;
    let deed = submit_deed(
        &state.store,
        DeedForm {
            user_id: req.user_id.as_deref(),
            deed_type: req.deed_type.as_deref(),
            description: req.description.as_deref(),
            proof_url: req.proof_url.as_deref(),
            catalog_item_id: req.catalog_item_id.as_deref(),
        },
    )?;
    ok(deed)
}

/// GET /api/deeds/{userId} — A user's deeds, newest first.
#[utoipa::path(
    get,
    path = "/api/deeds/{userId}",
    params(("userId" = String, Path, description = "User ID")),
    responses((status = 200, description = "The user's deeds", body = [Deed])),
    tag = "deeds"
)]
pub async fn list_user_deeds(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<Deed>> {
    ok(user_deeds(&state.store, &UserId::from(user_id)))
}
