//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CART_STORAGE_DIR` - Directory for the file-backed store (default: `.toolshed`)
//! - `CART_STORAGE_NAMESPACE` - Storage key namespace (default: `toolshed`)
//! - `CART_EXPIRY_DAYS` - Age in days after which a stored cart is discarded (default: 30)
//! - `CART_NOTIFY_DEDUP_MS` - Window in which identical notifications are suppressed (default: 2000)
//! - `CART_NOTIFY_SUCCESS_MS` - Success notification duration (default: 1500)
//! - `CART_NOTIFY_ERROR_MS` - Error notification duration (default: 2000)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::notify::GateConfig;

const DEFAULT_STORAGE_DIR: &str = ".toolshed";
const DEFAULT_NAMESPACE: &str = "toolshed";
const DEFAULT_EXPIRY_DAYS: u32 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart subsystem configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory for the file-backed store
    pub storage_dir: PathBuf,
    /// Prefix of the storage key (`<namespace>:cart`)
    pub namespace: String,
    /// Stored carts older than this many days are discarded on mount
    pub expiry_days: u32,
    /// Notification timing
    pub notifications: GateConfig,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            namespace: DEFAULT_NAMESPACE.to_string(),
            expiry_days: DEFAULT_EXPIRY_DAYS,
            notifications: GateConfig::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let gate = defaults.notifications;

        let storage_dir = lookup("CART_STORAGE_DIR").map_or(defaults.storage_dir, PathBuf::from);
        let namespace = lookup("CART_STORAGE_NAMESPACE").unwrap_or(defaults.namespace);
        validate_namespace(&namespace)?;

        let expiry_days = parse_or("CART_EXPIRY_DAYS", &lookup, DEFAULT_EXPIRY_DAYS)?;
        let notifications = GateConfig {
            dedup_window: parse_millis("CART_NOTIFY_DEDUP_MS", &lookup, gate.dedup_window)?,
            success_duration: parse_millis("CART_NOTIFY_SUCCESS_MS", &lookup, gate.success_duration)?,
            error_duration: parse_millis("CART_NOTIFY_ERROR_MS", &lookup, gate.error_duration)?,
            info_duration: gate.info_duration,
        };

        Ok(Self {
            storage_dir,
            namespace,
            expiry_days,
            notifications,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when unset.
fn parse_or<T>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a millisecond duration variable.
fn parse_millis(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_or(key, lookup, default_ms).map(Duration::from_millis)
}

/// Namespaces end up in storage keys and file names.
fn validate_namespace(namespace: &str) -> Result<(), ConfigError> {
    let valid = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "CART_STORAGE_NAMESPACE".to_string(),
            format!("must be non-empty and use only [A-Za-z0-9_-] (got {namespace:?})"),
        ))
    }
}
