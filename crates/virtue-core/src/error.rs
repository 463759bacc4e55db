//! # Error Types
//!
//! Errors shared by every VirtueVerse crate. Messages are user-facing: the
//! API layer returns them verbatim in the response envelope, so they are
//! phrased for the person filling in the form.

use thiserror::Error;

/// Top-level error type for foundational operations.
#[derive(Error, Debug)]
pub enum VirtueError {
    /// Timestamp outside the representable range.
    #[error("invalid timestamp: {0} ms since epoch")]
    InvalidTimestamp(i64),

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Request input that fails validation before touching the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields were absent or blank.
    #[error("{0}")]
    MissingFields(String),

    /// The email address is not plausibly an address.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// A deed resolution other than `verified` or `rejected` was requested.
    #[error("Invalid status")]
    UnknownStatus(String),

    /// A referenced catalog item does not exist.
    #[error("unknown catalog item: {0}")]
    UnknownCatalogItem(String),
}

/// Require every field to be present and non-blank.
///
/// Returns the trimmed values in the same order, or
/// [`ValidationError::MissingFields`] carrying `message`.
pub fn require_fields<'a, const N: usize>(
    fields: [Option<&'a str>; N],
    message: &str,
) -> Result<[&'a str; N], ValidationError> {
    let mut out = [""; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        match field.map(str::trim) {
            Some(value) if !value.is_empty() => *slot = value,
            _ => return Err(ValidationError::MissingFields(message.to_string())),
        }
    }
    Ok(out)
}
