//! # Accounts
//!
//! Signup, login, and profile lookup. Passwords are hashed with Argon2id
//! and only the PHC string is stored.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

use virtue_core::user::normalize_email;
use virtue_core::{PasswordHash, Role, User, UserId, ValidationError};

use crate::store::{StoreError, UserStore};

/// Errors from account operations.
#[derive(Error, Debug)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Login email does not belong to any account.
    #[error("Invalid credentials")]
    UnknownAccount,

    /// Login password does not match.
    #[error("Invalid credentials")]
    WrongPassword,

    /// Profile lookup for an unknown email.
    #[error("User not found")]
    ProfileNotFound,

    /// Hashing failed or the parameters are invalid.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Argon2id password hashing and verification.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for PasswordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordService").finish_non_exhaustive()
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordService {
    /// Argon2id with explicit memory (KiB) and iteration costs.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, AccountError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| AccountError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<PasswordHash, AccountError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| PasswordHash::from_phc(phc.to_string()))
            .map_err(|e| AccountError::Hashing(e.to_string()))
    }

    /// Check a password against a stored hash. Malformed hashes never match.
    pub fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        match PhcHash::new(hash.as_phc()) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Signup form fields, as received.
#[derive(Debug, Clone, Copy, Default)]
pub struct Signup<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
}

/// Create a regular user account with zero credits.
pub fn signup<U: UserStore + ?Sized>(
    users: &U,
    passwords: &PasswordService,
    form: Signup<'_>,
) -> Result<User, AccountError> {
    let [name, email, password] = virtue_core::error::require_fields(
        [form.name, form.email, form.password],
        "Name, email, and password required",
    )?;
    let email = normalize_email(email)?;
    if users.user_by_email(&email).is_some() {
        return Err(StoreError::DuplicateEmail(email).into());
    }

    let user = User {
        id: UserId::generate(),
        name: name.to_string(),
        email,
        role: Role::User,
        credits: 0,
        password_hash: passwords.hash(password)?,
    };
    users.create_user(user.clone())?;
    tracing::info!(user_id = %user.id, "account created");
    Ok(user)
}

/// Authenticate by email and password.
pub fn login<U: UserStore + ?Sized>(
    users: &U,
    passwords: &PasswordService,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<User, AccountError> {
    let [email, password] =
        virtue_core::error::require_fields([email, password], "Email and password required")?;
    let email = normalize_email(email).map_err(|_| AccountError::UnknownAccount)?;
    let user = users
        .user_by_email(&email)
        .ok_or(AccountError::UnknownAccount)?;
    if !passwords.verify(password, &user.password_hash) {
        tracing::debug!(user_id = %user.id, "password mismatch");
        return Err(AccountError::WrongPassword);
    }
    Ok(user)
}

/// Look up an account by email.
pub fn profile<U: UserStore + ?Sized>(users: &U, email: &str) -> Result<User, AccountError> {
    let email = normalize_email(email).map_err(|_| AccountError::ProfileNotFound)?;
    users
        .user_by_email(&email)
        .ok_or(AccountError::ProfileNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn passwords() -> PasswordService {
        PasswordService::with_cost(8, 1).unwrap()
    }

    fn form<'a>(name: &'a str, email: &'a str, password: &'a str) -> Signup<'a> {
        Signup {
            name: Some(name),
            email: Some(email),
            password: Some(password),
        }
    }

    #[test]
    fn hash_and_verify() {
        let pw = passwords();
        let hash = pw.hash("correct-horse").unwrap();
        assert!(hash.as_phc().starts_with("$argon2id$"));
        assert!(pw.verify("correct-horse", &hash));
        assert!(!pw.verify("wrong", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!passwords().verify("anything", &PasswordHash::default()));
    }

    #[test]
    fn signup_creates_regular_user_with_zero_credits() {
        let store = MemoryStore::new();
        let user = signup(&store, &passwords(), form("Carol", " Carol@Example.com ", "pw")).unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.credits, 0);
        assert_eq!(user.email, "carol@example.com");
        assert!(store.user_by_email("carol@example.com").is_some());
    }

    #[test]
    fn signup_requires_all_fields() {
        let store = MemoryStore::new();
        let err = signup(
            &store,
            &passwords(),
            Signup {
                name: Some("Carol"),
                email: Some("carol@example.com"),
                password: None,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Name, email, and password required");
    }

    #[test]
    fn signup_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let pw = passwords();
        signup(&store, &pw, form("Carol", "carol@example.com", "pw")).unwrap();
        let err = signup(&store, &pw, form("Other", "CAROL@example.com", "pw")).unwrap_err();
        assert_eq!(err.to_string(), "User with this email already exists");
    }

    #[test]
    fn login_round_trip() {
        let store = MemoryStore::new();
        let pw = passwords();
        let created = signup(&store, &pw, form("Carol", "carol@example.com", "pw")).unwrap();
        let logged_in = login(&store, &pw, Some("carol@example.com"), Some("pw")).unwrap();
        assert_eq!(logged_in.id, created.id);
    }

    #[test]
    fn login_distinguishes_unknown_account_and_wrong_password() {
        let store = MemoryStore::new();
        let pw = passwords();
        signup(&store, &pw, form("Carol", "carol@example.com", "pw")).unwrap();
        assert!(matches!(
            login(&store, &pw, Some("nobody@example.com"), Some("pw")),
            Err(AccountError::UnknownAccount)
        ));
        assert!(matches!(
            login(&store, &pw, Some("carol@example.com"), Some("nope")),
            Err(AccountError::WrongPassword)
        ));
    }

    #[test]
    fn profile_lookup() {
        let store = MemoryStore::new();
        let pw = passwords();
        signup(&store, &pw, form("Carol", "carol@example.com", "pw")).unwrap();
        assert_eq!(profile(&store, "Carol@example.com").unwrap().name, "Carol");
        assert!(matches!(
            profile(&store, "ghost@example.com"),
            Err(AccountError::ProfileNotFound)
        ));
    }
}
