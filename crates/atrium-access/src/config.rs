//! Admission configuration.
//!
//! Supports configuration via environment variables:
//!
//! ```bash
//! ATRIUM_INVITE_TOKEN_LENGTH=48       # alphanumeric chars, minimum 16
//! ATRIUM_DEFAULT_INVITE_ROLE=viewer   # role granted when none is requested
//! ```

use std::env;
use std::str::FromStr;

use thiserror::Error;

use atrium_storage::Role;

/// Default invite secret length in alphanumeric characters.
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Shorter secrets are guessable; refuse them outright.
pub const MIN_TOKEN_LENGTH: usize = 16;

/// Configuration for the admission controller
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Length of generated invite secrets
    pub token_length: usize,
    /// Role granted to joiners when the link doesn't request one
    pub default_invite_role: Role,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            token_length: DEFAULT_TOKEN_LENGTH,
            default_invite_role: Role::Member,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid invite token length: {0} (minimum {MIN_TOKEN_LENGTH})")]
    InvalidTokenLength(String),

    #[error("invalid default invite role: {0}")]
    InvalidRole(String),
}

impl AdmissionConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_length = match env::var("ATRIUM_INVITE_TOKEN_LENGTH") {
            Ok(raw) => {
                let length = raw
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidTokenLength(raw.clone()))?;
                if length < MIN_TOKEN_LENGTH {
                    return Err(ConfigError::InvalidTokenLength(raw));
                }
                length
            }
            Err(_) => DEFAULT_TOKEN_LENGTH,
        };

        let default_invite_role = match env::var("ATRIUM_DEFAULT_INVITE_ROLE") {
            Ok(raw) => {
                let role =
                    Role::from_str(&raw).map_err(|_| ConfigError::InvalidRole(raw.clone()))?;
                // An invitation must never mint a second owner
                if role == Role::Owner {
                    return Err(ConfigError::InvalidRole(raw));
                }
                role
            }
            Err(_) => Role::Member,
        };

        Ok(Self {
            token_length,
            default_invite_role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &["ATRIUM_INVITE_TOKEN_LENGTH", "ATRIUM_DEFAULT_INVITE_ROLE"];

    // Helper to clean up env vars - holds mutex lock
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
    }

    impl<'a> EnvGuard<'a> {
        fn new() -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            for var in ENV_VARS {
                env::remove_var(var);
            }
            Self { _lock: lock }
        }

        fn set(&self, key: &str, value: &str) {
            env::set_var(key, value);
        }
    }

    impl<'a> Drop for EnvGuard<'a> {
        fn drop(&mut self) {
            for var in ENV_VARS {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_defaults_when_env_unset() {
        let _guard = EnvGuard::new();

        let config = AdmissionConfig::from_env().unwrap();
        assert_eq!(config.token_length, DEFAULT_TOKEN_LENGTH);
        assert_eq!(config.default_invite_role, Role::Member);
    }

    #[test]
    fn test_env_overrides() {
        let guard = EnvGuard::new();
        guard.set("ATRIUM_INVITE_TOKEN_LENGTH", "48");
        guard.set("ATRIUM_DEFAULT_INVITE_ROLE", "viewer");

        let config = AdmissionConfig::from_env().unwrap();
        assert_eq!(config.token_length, 48);
        assert_eq!(config.default_invite_role, Role::Viewer);
    }

    #[test]
    fn test_token_length_below_minimum_rejected() {
        let guard = EnvGuard::new();
        guard.set("ATRIUM_INVITE_TOKEN_LENGTH", "8");

        let result = AdmissionConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidTokenLength(_))));
    }

    #[test]
    fn test_non_numeric_token_length_rejected() {
        let guard = EnvGuard::new();
        guard.set("ATRIUM_INVITE_TOKEN_LENGTH", "lots");

        let result = AdmissionConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidTokenLength(_))));
    }

    #[test]
    fn test_owner_default_role_rejected() {
        let guard = EnvGuard::new();
        guard.set("ATRIUM_DEFAULT_INVITE_ROLE", "owner");

        let result = AdmissionConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidRole(_))));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let guard = EnvGuard::new();
        guard.set("ATRIUM_DEFAULT_INVITE_ROLE", "superuser");

        let result = AdmissionConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidRole(_))));
    }
}
