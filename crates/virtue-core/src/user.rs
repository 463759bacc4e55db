//! # User Records
//!
//! A `User` is an account with a role and a credit balance. The balance is
//! only ever changed by deed verification; everything else about a user is
//! fixed at signup.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::identity::UserId;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular participant who submits deeds and appears on the leaderboard.
    User,
    /// Reviewer who verifies deeds. Never ranked.
    Admin,
}

impl Role {
    /// Whether this role may resolve pending deeds.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded password hash (PHC string format).
///
/// Redacted in `Debug` and never serialized.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-encoded PHC hash string.
    pub fn from_phc(encoded: String) -> Self {
        Self(encoded)
    }

    /// The encoded PHC string, for verification.
    pub fn as_phc(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

/// A user account as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Normalized (trimmed, lowercase) email; unique across accounts.
    pub email: String,
    pub role: Role,
    /// Virtue points earned from verified deeds.
    pub credits: u64,
    #[serde(skip)]
    pub password_hash: PasswordHash,
}

impl User {
    /// The public projection of this account.
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Public view of a user, as returned by auth and profile endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub credits: u64,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            credits: user.credits,
        }
    }
}

/// Normalize an email address for use as a lookup key.
///
/// Trims surrounding whitespace and lowercases. Rejects strings without a
/// single `@` separating non-empty local and domain parts.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(email)
        }
        _ => Err(ValidationError::InvalidEmail(raw.to_string())),
    }
}
