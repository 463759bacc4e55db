//! # virtue-core — Foundational Types for VirtueVerse
//!
//! Leaf crate of the workspace. Defines the identifier newtypes, the
//! wire-format timestamp, the user and catalog records, and the validation
//! error vocabulary shared by `virtue-state` and `virtue-api`.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `UserId`, `DeedId` and
//!    `CatalogItemId` are distinct types, so a deed id can never be passed
//!    where a user id is expected.
//!
//! 2. **Epoch-millisecond timestamps.** `Timestamp` serializes as an integer
//!    number of milliseconds since the Unix epoch, matching the front end's
//!    `Date.now()` contract.
//!
//! 3. **Secrets never serialize.** Password hashes live in `PasswordHash`,
//!    which is skipped by serde and redacted in `Debug` output.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `virtue-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod catalog;
pub mod error;
pub mod identity;
pub mod temporal;
pub mod user;

pub use catalog::DeedCatalogItem;
pub use error::{ValidationError, VirtueError};
pub use identity::{CatalogItemId, DeedId, UserId};
pub use temporal::Timestamp;
pub use user::{PasswordHash, Role, User, UserProfile};
