//! # Admin API
//!
//! Review queue, deed verification, and the credit audit. Mounted behind
//! [`crate::auth::admin_auth_middleware`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use virtue_core::error::require_fields;
use virtue_core::{DeedId, UserId};
use virtue_state::{
    audit_balances, pending_queue, BalanceDiscrepancy, DeedStore, DeedVerifier, PendingDeed,
    Resolution, UserStore, VerifyCommand,
};

use crate::error::{AppError, ErrorBody};
use crate::extractors::extract_json;
use crate::response::{ok, ApiResult, MessageBody};
use crate::state::AppState;

/// An admin decision on a pending deed.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub deed_id: Option<String>,
    /// `verified` or `rejected`.
    pub status: Option<String>,
    /// Reviewer recorded as `verifiedBy`. Must name an admin account.
    pub verifier_id: Option<String>,
}

impl VerifyRequest {
    fn into_command(self) -> Result<VerifyCommand, AppError> {
        let [deed_id, status] = require_fields(
            [self.deed_id.as_deref(), self.status.as_deref()],
            "Deed ID and status are required",
        )?;
        let resolution = Resolution::parse(status)?;
        let reviewer = self
            .verifier_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(UserId::from);
        Ok(VerifyCommand {
            deed_id: DeedId::from(deed_id),
            resolution,
            reviewer,
        })
    }
}

/// Result of a balance audit.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub users_checked: usize,
    pub deeds_checked: usize,
    /// Users whose balance disagrees with their verified deeds.
    pub discrepancies: Vec<BalanceDiscrepancy>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/deeds/pending", get(list_pending))
        .route("/api/admin/deeds/verify", post(verify_deed))
        .route("/api/admin/audit/credits", get(audit_credits))
}

/// GET /api/admin/deeds/pending — Review queue, oldest first.
#[utoipa::path(
    get,
    path = "/api/admin/deeds/pending",
    responses(
        (status = 200, description = "Pending deeds with submitter names", body = [PendingDeed]),
        (status = 401, description = "Missing or invalid admin token", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_pending(State(state): State<AppState>) -> ApiResult<Vec<PendingDeed>> {
    ok(pending_queue(&state.store))
}

/// POST /api/admin/deeds/verify — Resolve a pending deed.
#[utoipa::path(
    post,
    path = "/api/admin/deeds/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Deed resolved", body = MessageBody),
        (status = 400, description = "Invalid status, unknown verifier, or deed not pending", body = ErrorBody),
        (status = 401, description = "Missing or invalid admin token", body = ErrorBody),
        (status = 404, description = "Deed not found", body = ErrorBody),
        (status = 409, description = "Deed verified but submitter missing; no credits applied", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn verify_deed(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> ApiResult<MessageBody> {
    let cmd = extract_json(body)?.into_command()?;
    if let Some(reviewer) = &cmd.reviewer {
        match state.store.user(reviewer) {
            Some(user) if user.role.is_admin() => {}
            _ => {
                tracing::warn!(%reviewer, "verification attempted with a non-admin verifier");
                return Err(AppError::Validation("Invalid verifier".to_string()));
            }
        }
    }
    let outcome = DeedVerifier::new(&state.store, &state.store, &state.store).verify(cmd)?;
    ok(MessageBody {
        message: outcome.message(),
    })
}

/// GET /api/admin/audit/credits — Recompute balances and report mismatches.
#[utoipa::path(
    get,
    path = "/api/admin/audit/credits",
    responses(
        (status = 200, description = "Audit report", body = AuditReport),
        (status = 401, description = "Missing or invalid admin token", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn audit_credits(State(state): State<AppState>) -> ApiResult<AuditReport> {
    let users = state.store.users();
    let deeds = state.store.deeds();
    let discrepancies = audit_balances(&users, &deeds);
    if !discrepancies.is_empty() {
        tracing::warn!(count = discrepancies.len(), "credit audit found discrepancies");
    }
    ok(AuditReport {
        users_checked: users.len(),
        deeds_checked: deeds.len(),
        discrepancies,
    })
}
