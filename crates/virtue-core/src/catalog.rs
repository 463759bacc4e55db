//! # Deed Catalog Records
//!
//! Static reference entries describing deed types and their fixed credit
//! values. Catalog entries are seeded once and never mutated.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::identity::CatalogItemId;

/// One kind of deed and the credits it is worth once verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeedCatalogItem {
    pub id: CatalogItemId,
    /// Display title; also the label free-text submissions are matched on.
    pub title: String,
    pub description: String,
    pub category: String,
    pub credit_value: u64,
    pub illustration_url: String,
}
