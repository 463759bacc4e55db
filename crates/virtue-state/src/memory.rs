//! In-memory storage backend using DashMap.
//!
//! Users are indexed by id with a secondary email index; deeds by id. The
//! catalog is installed once and is immutable afterwards. Data is lost on
//! restart.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use virtue_core::{DeedCatalogItem, DeedId, User, UserId};

use crate::accounts::{AccountError, PasswordService};
use crate::deed::{Deed, DeedError};
use crate::seed;
use crate::store::{CatalogStore, DeedStore, StoreError, UserStore};

#[derive(Debug, Default)]
struct Inner {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    deeds: DashMap<DeedId, Deed>,
    catalog: OnceLock<Vec<DeedCatalogItem>>,
    /// Held for the whole seed load; `true` once a load succeeded.
    seeded: Mutex<bool>,
}

/// Shared in-memory entity store.
///
/// Cheaply cloneable via `Arc` — all clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// An empty store with no catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the catalog. Returns `false` if one is already installed.
    pub fn install_catalog(&self, items: Vec<DeedCatalogItem>) -> bool {
        self.inner.catalog.set(items).is_ok()
    }

    /// Load the demo users, catalog, and deeds the first time it is called.
    ///
    /// Returns `true` if this call performed the seeding. A failed load
    /// writes nothing and is retried by the next call.
    pub fn ensure_seeded(&self, passwords: &PasswordService) -> Result<bool, AccountError> {
        let mut seeded = self
            .inner
            .seeded
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *seeded {
            return Ok(false);
        }
        seed::load(self, passwords)?;
        *seeded = true;
        tracing::info!(
            users = self.inner.users.len(),
            deeds = self.inner.deeds.len(),
            "seeded entity store"
        );
        Ok(true)
    }

    pub fn user_count(&self) -> usize {
        self.inner.users.len()
    }

    pub fn deed_count(&self) -> usize {
        self.inner.deeds.len()
    }
}

impl UserStore for MemoryStore {
    fn user(&self, id: &UserId) -> Option<User> {
        self.inner.users.get(id).map(|e| e.value().clone())
    }

    fn user_by_email(&self, email: &str) -> Option<User> {
        let id = self.inner.emails.get(email).map(|e| e.value().clone())?;
        self.user(&id)
    }

    fn create_user(&self, user: User) -> Result<(), StoreError> {
        // Lock order: email index, then users.
        match self.inner.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail(user.email)),
            Entry::Vacant(email_slot) => match self.inner.users.entry(user.id.clone()) {
                Entry::Occupied(_) => Err(StoreError::DuplicateId(user.id.to_string())),
                Entry::Vacant(user_slot) => {
                    email_slot.insert(user.id.clone());
                    user_slot.insert(user);
                    Ok(())
                }
            },
        }
    }

    fn add_credits(&self, id: &UserId, amount: u64) -> Option<u64> {
        self.inner.users.get_mut(id).map(|mut entry| {
            let user = entry.value_mut();
            user.credits = user.credits.saturating_add(amount);
            user.credits
        })
    }

    fn users(&self) -> Vec<User> {
        self.inner.users.iter().map(|e| e.value().clone()).collect()
    }
}

impl DeedStore for MemoryStore {
    fn deed(&self, id: &DeedId) -> Option<Deed> {
        self.inner.deeds.get(id).map(|e| e.value().clone())
    }

    fn create_deed(&self, deed: Deed) -> Result<(), StoreError> {
        match self.inner.deeds.entry(deed.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateId(deed.id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(deed);
                Ok(())
            }
        }
    }

    fn mutate_deed(
        &self,
        id: &DeedId,
        mutate: &mut dyn FnMut(&mut Deed) -> Result<(), DeedError>,
    ) -> Result<Deed, DeedError> {
        // The shard write lock is held until `entry` drops.
        let mut entry = self
            .inner
            .deeds
            .get_mut(id)
            .ok_or_else(|| DeedError::NotFound(id.clone()))?;
        let mut next = entry.value().clone();
        mutate(&mut next)?;
        *entry.value_mut() = next.clone();
        Ok(next)
    }

    fn deeds(&self) -> Vec<Deed> {
        self.inner.deeds.iter().map(|e| e.value().clone()).collect()
    }
}

impl CatalogStore for MemoryStore {
    fn catalog(&self) -> Vec<DeedCatalogItem> {
        self.inner.catalog.get().cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use virtue_core::{PasswordHash, Role, Timestamp};

    use super::*;
    use crate::deed::{DeedStatus, DeedSubmission};

    fn user(id: &str, email: &str) -> User {
        User {
            id: UserId::from(id),
            name: id.to_uppercase(),
            email: email.to_string(),
            role: Role::User,
            credits: 0,
            password_hash: PasswordHash::default(),
        }
    }

    fn deed(user_id: &str) -> Deed {
        Deed::submit(
            DeedSubmission {
                user_id: UserId::from(user_id),
                deed_type: "Park Cleanup".to_string(),
                description: String::new(),
                proof_url: String::new(),
                catalog_item_id: None,
            },
            Timestamp::now(),
        )
    }

    #[test]
    fn create_and_lookup_user_by_id_and_email() {
        let store = MemoryStore::new();
        store.create_user(user("u1", "a@example.com")).unwrap();
        assert_eq!(store.user(&UserId::from("u1")).unwrap().email, "a@example.com");
        assert_eq!(store.user_by_email("a@example.com").unwrap().id, UserId::from("u1"));
        assert!(store.user_by_email("b@example.com").is_none());
        assert!(store.user_exists(&UserId::from("u1")));
    }

    #[test]
    fn duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.create_user(user("u1", "a@example.com")).unwrap();
        let err = store.create_user(user("u2", "a@example.com")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateEmail("a@example.com".into()));
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn duplicate_user_id_rejected_without_claiming_email() {
        let store = MemoryStore::new();
        store.create_user(user("u1", "a@example.com")).unwrap();
        let err = store.create_user(user("u1", "b@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));
        assert!(store.user_by_email("b@example.com").is_none());
    }

    #[test]
    fn add_credits_increments_and_reports_missing_users() {
        let store = MemoryStore::new();
        store.create_user(user("u1", "a@example.com")).unwrap();
        assert_eq!(store.add_credits(&UserId::from("u1"), 4), Some(4));
        assert_eq!(store.add_credits(&UserId::from("u1"), 1), Some(5));
        assert_eq!(store.add_credits(&UserId::from("ghost"), 1), None);
    }

    #[test]
    fn concurrent_add_credits_loses_no_updates() {
        let store = MemoryStore::new();
        store.create_user(user("u1", "a@example.com")).unwrap();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        store.add_credits(&UserId::from("u1"), 1);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(store.user(&UserId::from("u1")).unwrap().credits, 4_000);
    }

    #[test]
    fn mutate_deed_rolls_back_on_error() {
        let store = MemoryStore::new();
        let d = deed("u1");
        let id = d.id.clone();
        store.create_deed(d).unwrap();

        let err = store
            .mutate_deed(&id, &mut |deed| {
                deed.credits_awarded = 99;
                Err(DeedError::NotFound(deed.id.clone()))
            })
            .unwrap_err();
        assert!(matches!(err, DeedError::NotFound(_)));
        let stored = store.deed(&id).unwrap();
        assert_eq!(stored.credits_awarded, 0);
        assert_eq!(stored.status, DeedStatus::Pending);
    }

    #[test]
    fn mutate_missing_deed_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .mutate_deed(&DeedId::from("nope"), &mut |_| Ok(()))
            .unwrap_err();
        assert_eq!(err, DeedError::NotFound(DeedId::from("nope")));
    }

    #[test]
    fn duplicate_deed_id_rejected() {
        let store = MemoryStore::new();
        let d = deed("u1");
        store.create_deed(d.clone()).unwrap();
        assert!(store.create_deed(d).is_err());
        assert_eq!(store.deed_count(), 1);
    }

    #[test]
    fn catalog_installs_once() {
        let store = MemoryStore::new();
        assert!(store.catalog().is_empty());
        assert!(store.install_catalog(seed::catalog()));
        assert!(!store.install_catalog(Vec::new()));
        assert_eq!(store.catalog().len(), 6);
        assert!(store
            .catalog_item(&virtue_core::CatalogItemId::from("deed-3"))
            .is_some());
    }

    #[test]
    fn clones_share_data() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.create_user(user("u1", "a@example.com")).unwrap();
        assert!(clone.user_exists(&UserId::from("u1")));
    }
}
