//! # Deed Submission and History
//!
//! Users submit deeds as pending claims; the verification workflow resolves
//! them later. Submission never awards credits.

use thiserror::Error;

use virtue_core::error::require_fields;
use virtue_core::{CatalogItemId, Timestamp, UserId, ValidationError};

use crate::deed::{Deed, DeedSubmission};
use crate::store::{CatalogStore, DeedStore, StoreError, UserStore};

/// Errors from deed submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The submitting user does not exist.
    #[error("User not found")]
    UnknownUser(UserId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Deed form fields, as received.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeedForm<'a> {
    pub user_id: Option<&'a str>,
    pub deed_type: Option<&'a str>,
    pub description: Option<&'a str>,
    pub proof_url: Option<&'a str>,
    pub catalog_item_id: Option<&'a str>,
}

/// Validate a deed form and store it as a pending deed.
pub fn submit_deed<S>(store: &S, form: DeedForm<'_>) -> Result<Deed, SubmissionError>
where
    S: UserStore + DeedStore + CatalogStore + ?Sized,
{
    let [user_id, deed_type, description, proof_url] = require_fields(
        [form.user_id, form.deed_type, form.description, form.proof_url],
        "Missing required fields",
    )?;

    let user_id = UserId::from(user_id);
    if !store.user_exists(&user_id) {
        return Err(SubmissionError::UnknownUser(user_id));
    }

    let catalog_item_id = match form.catalog_item_id.map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let id = CatalogItemId::from(raw);
            if store.catalog_item(&id).is_none() {
                return Err(ValidationError::UnknownCatalogItem(raw.to_string()).into());
            }
            Some(id)
        }
    };

    let deed = Deed::submit(
        DeedSubmission {
            user_id,
            deed_type: deed_type.to_string(),
            description: description.to_string(),
            proof_url: proof_url.to_string(),
            catalog_item_id,
        },
        Timestamp::now(),
    );
    store.create_deed(deed.clone())?;
    tracing::info!(
        deed_id = %deed.id,
        user_id = %deed.user_id,
        deed_type = %deed.deed_type,
        "deed submitted"
    );
    Ok(deed)
}

/// A user's deeds, newest first.
pub fn user_deeds<D: DeedStore + ?Sized>(deeds: &D, user_id: &UserId) -> Vec<Deed> {
    let mut mine: Vec<Deed> = deeds
        .deeds()
        .into_iter()
        .filter(|d| &d.user_id == user_id)
        .collect();
    mine.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    mine
}
