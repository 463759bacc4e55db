//! # Catalog Lookup
//!
//! Maps a deed to the credits it earns. The catalog is small and static, so
//! lookups are linear scans.

use virtue_core::{CatalogItemId, DeedCatalogItem};

use crate::deed::Deed;

/// Credits awarded when a deed's type matches no catalog entry.
pub const DEFAULT_CREDIT_AWARD: u64 = 1;

/// Read-only view over the catalog entries.
#[derive(Debug, Clone, Copy)]
pub struct CatalogLookup<'a> {
    items: &'a [DeedCatalogItem],
}

impl<'a> CatalogLookup<'a> {
    pub fn new(items: &'a [DeedCatalogItem]) -> Self {
        Self { items }
    }

    /// Entry with the given id.
    pub fn item(&self, id: &CatalogItemId) -> Option<&'a DeedCatalogItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Credit value for a free-text deed type.
    ///
    /// Matches catalog titles exactly (case-sensitive). Falls back to
    /// [`DEFAULT_CREDIT_AWARD`] when nothing matches.
    pub fn credit_value_for(&self, deed_type: &str) -> u64 {
        self.items
            .iter()
            .find(|item| item.title == deed_type)
            .map_or(DEFAULT_CREDIT_AWARD, |item| item.credit_value)
    }

    /// Credits a deed earns on verification.
    ///
    /// A catalog id recorded at submission wins over the title match; an id
    /// that no longer resolves falls through to the title.
    pub fn award_for(&self, deed: &Deed) -> u64 {
        deed.catalog_item_id
            .as_ref()
            .and_then(|id| self.item(id))
            .map_or_else(
                || self.credit_value_for(&deed.deed_type),
                |item| item.credit_value,
            )
    }
}
