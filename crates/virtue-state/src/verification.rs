//! # Deed Verification Workflow
//!
//! Resolves a pending deed to `verified` or `rejected` and, on approval,
//! credits the submitter.
//!
//! ## Steps (approval)
//!
//! 1. Load the deed; fail with `NotFound` or `InvalidState` up front.
//! 2. Resolve the award through [`CatalogLookup::award_for`].
//! 3. Compare-and-set PENDING → VERIFIED inside [`DeedStore::mutate_deed`].
//!    Of several racing requests exactly one passes this step.
//! 4. Atomically add the award to the submitter's balance. A missing
//!    submitter leaves the deed verified and surfaces `PartialFailure`.
//!
//! Rejection performs only step 3 with PENDING → REJECTED and never reads
//! the catalog.
//!
//! The workflow is deliberately not idempotent: a retried request fails
//! with `InvalidState` rather than crediting twice.

use thiserror::Error;

use virtue_core::{DeedId, Timestamp, UserId, ValidationError};

use crate::catalog::CatalogLookup;
use crate::deed::{Deed, DeedError, DeedStatus, Resolution};
use crate::store::{CatalogStore, DeedStore, UserStore};

/// Errors from the verification workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// No deed with this id.
    #[error("Deed not found")]
    NotFound(DeedId),

    /// The deed is already verified or rejected.
    #[error("Deed is not pending verification")]
    InvalidState {
        /// The deed.
        id: DeedId,
        /// Its current status.
        status: DeedStatus,
    },

    /// The request was malformed (unknown status, missing fields).
    #[error(transparent)]
    InvalidArgument(#[from] ValidationError),

    /// The deed was verified but the submitter could not be credited.
    #[error("deed {deed_id} verified with {credits} credits but submitter {user_id} was not found")]
    PartialFailure {
        /// The verified deed.
        deed_id: DeedId,
        /// The missing submitter.
        user_id: UserId,
        /// Credits recorded on the deed but not applied to any balance.
        credits: u64,
    },
}

impl From<DeedError> for VerificationError {
    fn from(err: DeedError) -> Self {
        match err {
            DeedError::NotFound(id) => Self::NotFound(id),
            DeedError::NotPending { id, status } => Self::InvalidState { id, status },
        }
    }
}

/// An admin's request to resolve a deed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCommand {
    pub deed_id: DeedId,
    pub resolution: Resolution,
    /// Reviewer recorded as `verifiedBy`.
    pub reviewer: Option<UserId>,
}

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// The deed after the transition.
    pub deed: Deed,
    /// Submitter's balance after the award; `None` for rejections.
    pub new_balance: Option<u64>,
}

impl VerificationOutcome {
    /// Confirmation text returned to the reviewer.
    pub fn message(&self) -> String {
        format!("Deed successfully {}.", self.deed.status)
    }
}

/// The verification workflow over injected repositories.
pub struct DeedVerifier<'a, U: ?Sized, D: ?Sized, C: ?Sized> {
    users: &'a U,
    deeds: &'a D,
    catalog: &'a C,
}

impl<'a, U, D, C> DeedVerifier<'a, U, D, C>
where
    U: UserStore + ?Sized,
    D: DeedStore + ?Sized,
    C: CatalogStore + ?Sized,
{
    pub fn new(users: &'a U, deeds: &'a D, catalog: &'a C) -> Self {
        Self {
            users,
            deeds,
            catalog,
        }
    }

    /// Resolve a pending deed.
    pub fn verify(&self, cmd: VerifyCommand) -> Result<VerificationOutcome, VerificationError> {
        let current = self
            .deeds
            .deed(&cmd.deed_id)
            .ok_or_else(|| VerificationError::NotFound(cmd.deed_id.clone()))?;
        if !current.is_pending() {
            return Err(VerificationError::InvalidState {
                id: current.id,
                status: current.status,
            });
        }

        match cmd.resolution {
            Resolution::Rejected => self.reject(cmd),
            Resolution::Verified => self.approve(cmd, &current),
        }
    }

    fn reject(&self, cmd: VerifyCommand) -> Result<VerificationOutcome, VerificationError> {
        let now = Timestamp::now();
        let deed = self.deeds.mutate_deed(&cmd.deed_id, &mut |deed| {
            deed.reject(cmd.reviewer.clone(), now)
        })?;
        tracing::info!(deed_id = %deed.id, status = %deed.status, "deed resolved");
        Ok(VerificationOutcome {
            deed,
            new_balance: None,
        })
    }

    fn approve(
        &self,
        cmd: VerifyCommand,
        current: &Deed,
    ) -> Result<VerificationOutcome, VerificationError> {
        let items = self.catalog.catalog();
        let credits = CatalogLookup::new(&items).award_for(current);

        let now = Timestamp::now();
        let deed = self.deeds.mutate_deed(&cmd.deed_id, &mut |deed| {
            deed.verify(credits, cmd.reviewer.clone(), now)
        })?;

        let Some(balance) = self.users.add_credits(&deed.user_id, credits) else {
            tracing::warn!(
                deed_id = %deed.id,
                user_id = %deed.user_id,
                credits,
                "deed verified but submitter not found; no credits applied"
            );
            return Err(VerificationError::PartialFailure {
                deed_id: deed.id,
                user_id: deed.user_id,
                credits,
            });
        };

        tracing::info!(
            deed_id = %deed.id,
            status = %deed.status,
            credits,
            balance,
            "deed resolved"
        );
        Ok(VerificationOutcome {
            deed,
            new_balance: Some(balance),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use virtue_core::{CatalogItemId, DeedCatalogItem, PasswordHash, Role, User};

    use super::*;
    use crate::deed::DeedSubmission;
    use crate::memory::MemoryStore;

    fn park_cleanup() -> DeedCatalogItem {
        DeedCatalogItem {
            id: CatalogItemId::from("deed-3"),
            title: "Park Cleanup".to_string(),
            description: "Participate in a local park cleanup event.".to_string(),
            category: "Environment".to_string(),
            credit_value: 4,
            illustration_url: String::new(),
        }
    }

    fn store_with_user(credits: u64) -> MemoryStore {
        let store = MemoryStore::new();
        store.install_catalog(vec![park_cleanup()]);
        store
            .create_user(User {
                id: UserId::from("U"),
                name: "Una".to_string(),
                email: "una@example.com".to_string(),
                role: Role::User,
                credits,
                password_hash: PasswordHash::default(),
            })
            .unwrap();
        store
    }

    fn add_pending(store: &MemoryStore, user_id: &str, deed_type: &str) -> DeedId {
        let deed = Deed::submit(
            DeedSubmission {
                user_id: UserId::from(user_id),
                deed_type: deed_type.to_string(),
                description: "did a thing".to_string(),
                proof_url: "https://example.com/p.jpg".to_string(),
                catalog_item_id: None,
            },
            Timestamp::now(),
        );
        let id = deed.id.clone();
        store.create_deed(deed).unwrap();
        id
    }

    fn cmd(deed_id: &DeedId, resolution: Resolution) -> VerifyCommand {
        VerifyCommand {
            deed_id: deed_id.clone(),
            resolution,
            reviewer: Some(UserId::from("admin")),
        }
    }

    fn verifier(store: &MemoryStore) -> DeedVerifier<'_, MemoryStore, MemoryStore, MemoryStore> {
        DeedVerifier::new(store, store, store)
    }

    fn balance(store: &MemoryStore) -> u64 {
        store.user(&UserId::from("U")).unwrap().credits
    }

    #[test]
    fn park_cleanup_awards_catalog_value() {
        let store = store_with_user(0);
        let id = add_pending(&store, "U", "Park Cleanup");

        let outcome = verifier(&store).verify(cmd(&id, Resolution::Verified)).unwrap();

        assert_eq!(outcome.deed.status, DeedStatus::Verified);
        assert_eq!(outcome.deed.credits_awarded, 4);
        assert!(outcome.deed.verified_at.is_some());
        assert_eq!(outcome.deed.verified_by, Some(UserId::from("admin")));
        assert_eq!(outcome.new_balance, Some(4));
        assert_eq!(outcome.message(), "Deed successfully verified.");
        assert_eq!(balance(&store), 4);
        assert_eq!(store.deed(&id).unwrap(), outcome.deed);
    }

    #[test]
    fn unknown_deed_type_awards_fallback() {
        let store = store_with_user(7);
        let id = add_pending(&store, "U", "Unknown Deed");

        let outcome = verifier(&store).verify(cmd(&id, Resolution::Verified)).unwrap();

        assert_eq!(outcome.deed.credits_awarded, 1);
        assert_eq!(balance(&store), 8);
    }

    #[test]
    fn rejection_changes_no_credits() {
        let store = store_with_user(3);
        let id = add_pending(&store, "U", "Park Cleanup");

        let outcome = verifier(&store).verify(cmd(&id, Resolution::Rejected)).unwrap();

        assert_eq!(outcome.deed.status, DeedStatus::Rejected);
        assert_eq!(outcome.deed.credits_awarded, 0);
        assert_eq!(outcome.new_balance, None);
        assert_eq!(outcome.message(), "Deed successfully rejected.");
        assert_eq!(balance(&store), 3);
    }

    #[test]
    fn verifying_rejected_deed_is_invalid_state_and_changes_nothing() {
        let store = store_with_user(0);
        let id = add_pending(&store, "U", "Park Cleanup");
        verifier(&store).verify(cmd(&id, Resolution::Rejected)).unwrap();
        let before = store.deed(&id).unwrap();

        let err = verifier(&store).verify(cmd(&id, Resolution::Verified)).unwrap_err();

        assert_eq!(
            err,
            VerificationError::InvalidState {
                id: id.clone(),
                status: DeedStatus::Rejected
            }
        );
        assert_eq!(store.deed(&id).unwrap(), before);
        assert_eq!(balance(&store), 0);
    }

    #[test]
    fn reverifying_does_not_double_award() {
        let store = store_with_user(0);
        let id = add_pending(&store, "U", "Park Cleanup");
        verifier(&store).verify(cmd(&id, Resolution::Verified)).unwrap();

        let err = verifier(&store).verify(cmd(&id, Resolution::Verified)).unwrap_err();

        assert!(matches!(err, VerificationError::InvalidState { .. }));
        assert_eq!(err.to_string(), "Deed is not pending verification");
        assert_eq!(balance(&store), 4);
        assert_eq!(store.deed(&id).unwrap().credits_awarded, 4);
    }

    #[test]
    fn missing_deed_is_not_found() {
        let store = store_with_user(0);
        let err = verifier(&store)
            .verify(cmd(&DeedId::from("missing"), Resolution::Verified))
            .unwrap_err();
        assert_eq!(err, VerificationError::NotFound(DeedId::from("missing")));
        assert_eq!(err.to_string(), "Deed not found");
    }

    #[test]
    fn missing_submitter_is_partial_failure() {
        let store = store_with_user(0);
        let id = add_pending(&store, "ghost", "Park Cleanup");

        let err = verifier(&store).verify(cmd(&id, Resolution::Verified)).unwrap_err();

        assert_eq!(
            err,
            VerificationError::PartialFailure {
                deed_id: id.clone(),
                user_id: UserId::from("ghost"),
                credits: 4,
            }
        );
        let deed = store.deed(&id).unwrap();
        assert_eq!(deed.status, DeedStatus::Verified);
        assert_eq!(deed.credits_awarded, 4);
        assert_eq!(balance(&store), 0);
    }

    #[test]
    fn catalog_reference_overrides_title() {
        let store = store_with_user(0);
        let deed = Deed::submit(
            DeedSubmission {
                user_id: UserId::from("U"),
                deed_type: "cleaned up the park".to_string(),
                description: String::new(),
                proof_url: String::new(),
                catalog_item_id: Some(CatalogItemId::from("deed-3")),
            },
            Timestamp::now(),
        );
        let id = deed.id.clone();
        store.create_deed(deed).unwrap();

        let outcome = verifier(&store).verify(cmd(&id, Resolution::Verified)).unwrap();
        assert_eq!(outcome.deed.credits_awarded, 4);
    }

    #[test]
    fn concurrent_verification_awards_once() {
        let store = Arc::new(store_with_user(0));
        let id = add_pending(&store, "U", "Park Cleanup");

        let threads: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = id.clone();
                std::thread::spawn(move || {
                    DeedVerifier::new(&*store, &*store, &*store)
                        .verify(cmd(&id, Resolution::Verified))
                        .is_ok()
                })
            })
            .collect();
        let successes = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(balance(&store), 4);
    }

    /// A store whose deed lookup always reports `pending`, to drive the
    /// compare-and-set path the way a racing request would see it.
    struct StalePending {
        real: MemoryStore,
    }

    impl DeedStore for StalePending {
        fn deed(&self, id: &DeedId) -> Option<Deed> {
            self.real.deed(id).map(|mut d| {
                d.status = DeedStatus::Pending;
                d
            })
        }

        fn create_deed(&self, deed: Deed) -> Result<(), crate::store::StoreError> {
            self.real.create_deed(deed)
        }

        fn mutate_deed(
            &self,
            id: &DeedId,
            mutate: &mut dyn FnMut(&mut Deed) -> Result<(), DeedError>,
        ) -> Result<Deed, DeedError> {
            self.real.mutate_deed(id, mutate)
        }

        fn deeds(&self) -> Vec<Deed> {
            self.real.deeds()
        }
    }

    #[test]
    fn compare_and_set_rejects_stale_precondition() {
        let store = store_with_user(0);
        let id = add_pending(&store, "U", "Park Cleanup");
        verifier(&store).verify(cmd(&id, Resolution::Verified)).unwrap();

        let stale = StalePending { real: store.clone() };
        let err = DeedVerifier::new(&store, &stale, &store)
            .verify(cmd(&id, Resolution::Verified))
            .unwrap_err();

        assert!(matches!(err, VerificationError::InvalidState { .. }));
        assert_eq!(balance(&store), 4);
    }
}
