//! # Deed Lifecycle State Machine
//!
//! ```text
//! Pending ──▶ Verified (terminal)
//!    │
//!    └──────▶ Rejected (terminal)
//! ```
//!
//! A deed never re-enters `Pending` and never leaves a terminal state.
//! `credits_awarded` is written exactly once, by [`Deed::verify`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use virtue_core::{CatalogItemId, DeedId, Timestamp, UserId, ValidationError};

// ─── Deed Status ─────────────────────────────────────────────────────

/// The lifecycle state of a deed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeedStatus {
    /// Submitted, awaiting admin review.
    Pending,
    /// Approved; credits have been awarded (terminal).
    Verified,
    /// Declined; no credits (terminal).
    Rejected,
}

impl DeedStatus {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for DeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An admin's decision on a pending deed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Verified,
    Rejected,
}

impl Resolution {
    /// Parse a requested resolution. Only `verified` and `rejected` are
    /// accepted; `pending` and anything else is an invalid argument.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }

    /// The terminal status this resolution produces.
    pub fn status(&self) -> DeedStatus {
        match self {
            Self::Verified => DeedStatus::Verified,
            Self::Rejected => DeedStatus::Rejected,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status().as_str())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by deed lifecycle transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeedError {
    /// No deed with this id exists.
    #[error("Deed not found")]
    NotFound(DeedId),

    /// The deed has already been resolved.
    #[error("Deed is not pending verification")]
    NotPending {
        /// The deed.
        id: DeedId,
        /// Its current (terminal) status.
        status: DeedStatus,
    },
}

// ─── Deed ────────────────────────────────────────────────────────────

/// A user's claim of a good act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deed {
    pub id: DeedId,
    pub user_id: UserId,
    /// Free-text deed type, normally a catalog title.
    pub deed_type: String,
    pub description: String,
    pub proof_url: String,
    pub status: DeedStatus,
    pub credits_awarded: u64,
    #[schema(value_type = i64)]
    pub created_at: Timestamp,
    /// When the deed was resolved (verified or rejected).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>)]
    pub verified_at: Option<Timestamp>,
    /// The reviewer who resolved the deed, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<UserId>,
    /// Catalog entry chosen at submission, when the client supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_item_id: Option<CatalogItemId>,
}

/// Fields a user provides when submitting a deed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeedSubmission {
    pub user_id: UserId,
    pub deed_type: String,
    pub description: String,
    pub proof_url: String,
    pub catalog_item_id: Option<CatalogItemId>,
}

impl Deed {
    /// Create a new pending deed from a submission.
    pub fn submit(submission: DeedSubmission, created_at: Timestamp) -> Self {
        Self {
            id: DeedId::generate(),
            user_id: submission.user_id,
            deed_type: submission.deed_type,
            description: submission.description,
            proof_url: submission.proof_url,
            status: DeedStatus::Pending,
            credits_awarded: 0,
            created_at,
            verified_at: None,
            verified_by: None,
            catalog_item_id: submission.catalog_item_id,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == DeedStatus::Pending
    }

    /// Approve the deed (PENDING → VERIFIED), recording the award.
    pub fn verify(
        &mut self,
        credits: u64,
        reviewer: Option<UserId>,
        at: Timestamp,
    ) -> Result<(), DeedError> {
        self.require_pending()?;
        self.status = DeedStatus::Verified;
        self.credits_awarded = credits;
        self.verified_at = Some(at);
        self.verified_by = reviewer;
        Ok(())
    }

    /// Decline the deed (PENDING → REJECTED). The award stays at zero.
    pub fn reject(&mut self, reviewer: Option<UserId>, at: Timestamp) -> Result<(), DeedError> {
        self.require_pending()?;
        self.status = DeedStatus::Rejected;
        self.verified_at = Some(at);
        self.verified_by = reviewer;
        Ok(())
    }

    fn require_pending(&self) -> Result<(), DeedError> {
        if self.status.is_terminal() {
            return Err(DeedError::NotPending {
                id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
