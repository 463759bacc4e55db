//! # Repository Traits
//!
//! The workflows in this crate talk to storage only through these traits,
//! so they run unchanged against [`MemoryStore`](crate::memory::MemoryStore)
//! or a test fake.
//!
//! Two operations carry atomicity requirements:
//!
//! - [`DeedStore::mutate_deed`] applies its closure while holding exclusive
//!   access to the record. A transition checked and applied inside the
//!   closure is a compare-and-set.
//! - [`UserStore::add_credits`] is an atomic increment, never a
//!   read-modify-write across two calls.

use thiserror::Error;

use virtue_core::{CatalogItemId, DeedCatalogItem, DeedId, User, UserId};

use crate::deed::{Deed, DeedError};

/// Errors raised when creating records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An account with this email already exists.
    #[error("User with this email already exists")]
    DuplicateEmail(String),

    /// A record with this id already exists.
    #[error("duplicate id: {0}")]
    DuplicateId(String),
}

/// Storage for user accounts, indexed by id and by email.
pub trait UserStore: Send + Sync {
    fn user(&self, id: &UserId) -> Option<User>;

    /// Look up by normalized email.
    fn user_by_email(&self, email: &str) -> Option<User>;

    fn user_exists(&self, id: &UserId) -> bool {
        self.user(id).is_some()
    }

    /// Insert a new account. Fails if the id or email is taken.
    fn create_user(&self, user: User) -> Result<(), StoreError>;

    /// Atomically add `amount` to the user's balance.
    ///
    /// Returns the new balance, or `None` if the user does not exist.
    fn add_credits(&self, id: &UserId, amount: u64) -> Option<u64>;

    fn users(&self) -> Vec<User>;
}

/// Storage for deeds.
pub trait DeedStore: Send + Sync {
    fn deed(&self, id: &DeedId) -> Option<Deed>;

    fn create_deed(&self, deed: Deed) -> Result<(), StoreError>;

    /// Apply `mutate` to the stored deed under exclusive access.
    ///
    /// The record is replaced only if `mutate` succeeds; on error it is left
    /// untouched. Returns the updated deed.
    fn mutate_deed(
        &self,
        id: &DeedId,
        mutate: &mut dyn FnMut(&mut Deed) -> Result<(), DeedError>,
    ) -> Result<Deed, DeedError>;

    fn deeds(&self) -> Vec<Deed>;
}

/// Read access to the static deed catalog.
pub trait CatalogStore: Send + Sync {
    fn catalog(&self) -> Vec<DeedCatalogItem>;

    fn catalog_item(&self, id: &CatalogItemId) -> Option<DeedCatalogItem> {
        self.catalog().into_iter().find(|item| &item.id == id)
    }
}
