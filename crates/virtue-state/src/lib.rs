//! # virtue-state — Deed Lifecycle and Entity Store
//!
//! Everything between the HTTP layer and the data:
//!
//! - [`deed`]: the PENDING → VERIFIED | REJECTED state machine.
//! - [`verification`]: the admin verification workflow that resolves a deed
//!   and credits its submitter.
//! - [`catalog`]: deed type to credit value lookup.
//! - [`leaderboard`], [`queue`], [`submission`]: read projections and the
//!   submit path used by the API.
//! - [`audit`]: recompute-and-compare check of every credit balance.
//! - [`accounts`]: signup, login, profile, Argon2id hashing.
//! - [`store`] and [`memory`]: repository traits and the DashMap-backed
//!   implementation, with [`seed`] demo data.
//!
//! Workflows take repositories by trait reference, so they are exercised
//! against [`MemoryStore`] in production and against fakes in tests.

pub mod accounts;
pub mod audit;
pub mod catalog;
pub mod deed;
pub mod leaderboard;
pub mod memory;
pub mod queue;
pub mod seed;
pub mod store;
pub mod submission;
pub mod verification;

pub use accounts::{AccountError, PasswordService, Signup};
pub use audit::{audit_balances, BalanceDiscrepancy};
pub use catalog::{CatalogLookup, DEFAULT_CREDIT_AWARD};
pub use deed::{Deed, DeedError, DeedStatus, DeedSubmission, Resolution};
pub use leaderboard::{leaderboard, LeaderboardEntry, LEADERBOARD_SIZE};
pub use memory::MemoryStore;
pub use queue::{pending_queue, PendingDeed};
pub use store::{CatalogStore, DeedStore, StoreError, UserStore};
pub use submission::{submit_deed, user_deeds, DeedForm, SubmissionError};
pub use verification::{DeedVerifier, VerificationError, VerificationOutcome, VerifyCommand};
