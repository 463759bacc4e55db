//! # Application State
//!
//! Shared state handed to every handler through the `State` extractor.
//! Cloning is cheap: the store is `Arc`-backed and the password service
//! holds only Argon2 parameters.

use virtue_state::{AccountError, MemoryStore, PasswordService};

/// A secret string whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret. Callers must not log it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

/// Runtime configuration, assembled by the binary from flags and env.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Bearer token guarding `/api/admin/*`. `None` leaves admin routes open.
    pub admin_token: Option<SecretString>,
    /// Mount `/metrics` and record HTTP metrics.
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            admin_token: None,
            metrics_enabled: true,
        }
    }
}

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub passwords: PasswordService,
    pub config: AppConfig,
}

impl AppState {
    /// Empty store, default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            store: MemoryStore::new(),
            passwords: PasswordService::default(),
            config,
        }
    }

    /// Replace the password service, e.g. with cheaper Argon2 parameters.
    pub fn with_passwords(mut self, passwords: PasswordService) -> Self {
        self.passwords = passwords;
        self
    }

    /// Load the demo catalog, accounts, and deeds if not already loaded.
    pub fn seed(&self) -> Result<bool, AccountError> {
        self.store.ensure_seeded(&self.passwords)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_redacted_in_debug() {
        let config = AppConfig {
            admin_token: Some(SecretString::new("hunter2")),
            ..AppConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert!(config.admin_token.is_none());
        assert!(config.metrics_enabled);
    }

    #[test]
    fn clones_share_the_store() {
        let state = AppState::new().with_passwords(PasswordService::with_cost(8, 1).unwrap());
        let clone = state.clone();
        assert!(state.seed().unwrap());
        assert!(!clone.seed().unwrap());
        assert_eq!(clone.store.user_count(), 3);
    }
}
