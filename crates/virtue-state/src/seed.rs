//! Demo data loaded into a fresh store.
//!
//! Seeded balances agree with the seeded verified deeds, so a credit audit
//! of a freshly seeded store is clean.

use virtue_core::{CatalogItemId, DeedCatalogItem, DeedId, Role, Timestamp, User, UserId};

use crate::accounts::{AccountError, PasswordService};
use crate::deed::{Deed, DeedStatus};
use crate::memory::MemoryStore;
use crate::store::{DeedStore, StoreError, UserStore};

/// The static deed catalog.
pub fn catalog() -> Vec<DeedCatalogItem> {
    [
        ("deed-1", "Community Garden Helper", "Spend an hour helping at the local community garden.", "Environment", 5, "/illustrations/gardening.svg"),
        ("deed-2", "Neighbor Grocery Run", "Help an elderly or disabled neighbor with their grocery shopping.", "Community Support", 3, "/illustrations/groceries.svg"),
        ("deed-3", "Park Cleanup", "Participate in a local park cleanup event.", "Environment", 4, "/illustrations/cleanup.svg"),
        ("deed-4", "Tutor a Student", "Offer one hour of free tutoring to a local student.", "Education", 5, "/illustrations/tutoring.svg"),
        ("deed-5", "Donate Blood", "Donate blood at a local blood drive.", "Health", 10, "/illustrations/blood-donation.svg"),
        ("deed-6", "Walk a Shelter Dog", "Volunteer to walk a dog at the local animal shelter.", "Animal Welfare", 3, "/illustrations/dog-walking.svg"),
    ]
    .into_iter()
    .map(|(id, title, description, category, credit_value, illustration_url)| DeedCatalogItem {
        id: CatalogItemId::from(id),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        credit_value,
        illustration_url: illustration_url.to_string(),
    })
    .collect()
}

struct SeedUser {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    credits: u64,
}

const USERS: [SeedUser; 3] = [
    SeedUser { id: "u1", name: "Alice", email: "alice@example.com", password: "password123", role: Role::User, credits: 12 },
    SeedUser { id: "u2", name: "Bob", email: "bob@example.com", password: "password123", role: Role::User, credits: 8 },
    SeedUser { id: "admin", name: "Admin", email: "admin@example.com", password: "admin", role: Role::Admin, credits: 0 },
];

struct SeedDeed {
    id: &'static str,
    user_id: &'static str,
    deed_type: &'static str,
    description: &'static str,
    /// Credits when verified, `None` while pending.
    award: Option<u64>,
    created_days_ago: i64,
}

const DEEDS: [SeedDeed; 7] = [
    SeedDeed { id: "d1", user_id: "u1", deed_type: "Community Garden Helper", description: "Helped weed the vegetable patch.", award: Some(5), created_days_ago: 2 },
    SeedDeed { id: "d2", user_id: "u2", deed_type: "Park Cleanup", description: "Collected two bags of trash from the park.", award: Some(4), created_days_ago: 3 },
    SeedDeed { id: "d3", user_id: "u1", deed_type: "Neighbor Grocery Run", description: "Got groceries for Mrs. Gable.", award: None, created_days_ago: 1 },
    SeedDeed { id: "d4", user_id: "u1", deed_type: "Walk a Shelter Dog", description: "Took Biscuit around the lake.", award: Some(3), created_days_ago: 5 },
    SeedDeed { id: "d5", user_id: "u1", deed_type: "Park Cleanup", description: "Spring cleanup at Riverside Park.", award: Some(4), created_days_ago: 6 },
    SeedDeed { id: "d6", user_id: "u2", deed_type: "Neighbor Grocery Run", description: "Weekly shop for the Okafors.", award: Some(3), created_days_ago: 7 },
    SeedDeed { id: "d7", user_id: "u2", deed_type: "Library Book Drive", description: "Sorted donated books at the branch library.", award: Some(1), created_days_ago: 8 },
];

/// Populate `store` with the catalog, demo accounts, and demo deeds.
///
/// Passwords are hashed and id/email conflicts checked before anything is
/// written, so a failure leaves the store untouched.
pub(crate) fn load(store: &MemoryStore, passwords: &PasswordService) -> Result<(), AccountError> {
    let mut users = Vec::with_capacity(USERS.len());
    for seed in &USERS {
        let id = UserId::from(seed.id);
        if store.user_exists(&id) {
            return Err(StoreError::DuplicateId(seed.id.to_string()).into());
        }
        if store.user_by_email(seed.email).is_some() {
            return Err(StoreError::DuplicateEmail(seed.email.to_string()).into());
        }
        users.push(User {
            id,
            name: seed.name.to_string(),
            email: seed.email.to_string(),
            role: seed.role,
            credits: seed.credits,
            password_hash: passwords.hash(seed.password)?,
        });
    }

    store.install_catalog(catalog());
    for user in users {
        store.create_user(user)?;
    }

    let now = Timestamp::now();
    for seed in &DEEDS {
        let created_at = now.days_before(seed.created_days_ago);
        let (status, credits_awarded, verified_at, verified_by) = match seed.award {
            Some(credits) => (
                DeedStatus::Verified,
                credits,
                Some(now.days_before(seed.created_days_ago - 1)),
                Some(UserId::from("admin")),
            ),
            None => (DeedStatus::Pending, 0, None, None),
        };
        store.create_deed(Deed {
            id: DeedId::from(seed.id),
            user_id: UserId::from(seed.user_id),
            deed_type: seed.deed_type.to_string(),
            description: seed.description.to_string(),
            proof_url: "https://example.com/proof.jpg".to_string(),
            status,
            credits_awarded,
            created_at,
            verified_at,
            verified_by,
            catalog_item_id: None,
        })?;
    }
    Ok(())
}
