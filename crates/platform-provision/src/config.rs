//! Sync configuration.
//!
//! Provides the policy catalog, resource naming and identity retry policy
//! used by the sync workflow. Configuration is loaded from environment
//! variables or JSON, with defaults suitable for local development.

use crate::retry::RetryConfig;
use platform_access::{NamingScheme, PolicyCatalog, PolicyId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration document could not be parsed.
    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Configuration of the sync workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Tier to policy table.
    pub policies: PolicyCatalog,

    /// Resource name prefixes.
    pub naming: NamingScheme,

    /// Retry policy for identity creation.
    pub identity_retry: RetryConfig,
}

impl Default for SyncConfig {
    /// Returns the historical policies, prefixes and five-attempt retry.
    fn default() -> Self {
        Self {
            policies: PolicyCatalog::default(),
            naming: NamingScheme::default(),
            identity_retry: RetryConfig::identity_default(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ACCESS_SYNC_ADMIN_POLICY`: Policy bound to Admin identities
    /// - `ACCESS_SYNC_DEVELOPER_POLICY`: Policy bound to Developer identities
    /// - `ACCESS_SYNC_NAMESPACE_PREFIX`: Namespace prefix (default: user-)
    /// - `ACCESS_SYNC_IDENTITY_PREFIX`: Identity prefix (default: openshift-)
    /// - `ACCESS_SYNC_IDENTITY_MAX_ATTEMPTS`: Identity create attempts (default: 5)
    /// - `ACCESS_SYNC_IDENTITY_RETRY_DELAY_MS`: Delay before the first retry,
    ///   0 disables backoff (default: 0)
    /// - `ACCESS_SYNC_IDENTITY_RETRY_MAX_DELAY_MS`: Backoff cap (default: 30000)
    /// - `ACCESS_SYNC_IDENTITY_RETRY_JITTER`: Randomize backoff (default: false)
    ///
    /// Unset, blank or unparseable values fall back to the defaults. The
    /// result is not validated; call [`SyncConfig::validate`] before use.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let text = |key: &str| var(key).filter(|s| !s.trim().is_empty());
        let parsed = |key: &str| text(key).and_then(|s| s.parse::<u64>().ok());

        let initial_delay = parsed("ACCESS_SYNC_IDENTITY_RETRY_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(default.identity_retry.initial_delay);
        let max_delay = parsed("ACCESS_SYNC_IDENTITY_RETRY_MAX_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or_else(|| {
                if initial_delay.is_zero() {
                    default.identity_retry.max_delay
                } else {
                    Duration::from_secs(30)
                }
            });

        Self {
            policies: PolicyCatalog {
                admin: text("ACCESS_SYNC_ADMIN_POLICY")
                    .map(PolicyId::from)
                    .unwrap_or(default.policies.admin),
                developer: text("ACCESS_SYNC_DEVELOPER_POLICY")
                    .map(PolicyId::from)
                    .unwrap_or(default.policies.developer),
            },
            naming: NamingScheme {
                namespace_prefix: text("ACCESS_SYNC_NAMESPACE_PREFIX")
                    .unwrap_or(default.naming.namespace_prefix),
                identity_prefix: text("ACCESS_SYNC_IDENTITY_PREFIX")
                    .unwrap_or(default.naming.identity_prefix),
            },
            identity_retry: RetryConfig {
                max_attempts: text("ACCESS_SYNC_IDENTITY_MAX_ATTEMPTS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(default.identity_retry.max_attempts),
                initial_delay,
                max_delay: max_delay.max(initial_delay),
                exponential_base: default.identity_retry.exponential_base,
                jitter: text("ACCESS_SYNC_IDENTITY_RETRY_JITTER")
                    .map(|s| s == "true" || s == "1")
                    .unwrap_or(default.identity_retry.jitter),
            },
        }
    }

    /// Parse configuration from a JSON document.
    ///
    /// Missing sections take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.policies.admin.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "policies.admin".to_string(),
                message: "policy identifier must not be empty".to_string(),
            });
        }
        if self.policies.developer.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "policies.developer".to_string(),
                message: "policy identifier must not be empty".to_string(),
            });
        }
        if self.identity_retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "identity_retry.max_attempts".to_string(),
                message: "at least one attempt is required".to_string(),
            });
        }
        let base = self.identity_retry.exponential_base;
        if !base.is_finite() || base < 1.0 {
            return Err(ConfigError::InvalidValue {
                key: "identity_retry.exponential_base".to_string(),
                message: format!("must be a finite number >= 1.0, got {}", base),
            });
        }
        if self.identity_retry.max_delay < self.identity_retry.initial_delay {
            return Err(ConfigError::InvalidValue {
                key: "identity_retry.max_delay".to_string(),
                message: "must not be shorter than initial_delay".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.identity_retry.max_attempts, 5);
        assert!(!config.identity_retry.has_backoff());
        assert_eq!(config.naming.namespace_prefix, "user-");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        assert_eq!(SyncConfig::from_lookup(lookup(&[])), SyncConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        let config = SyncConfig::from_lookup(lookup(&[
            ("ACCESS_SYNC_ADMIN_POLICY", "arn:staging:admin"),
            ("ACCESS_SYNC_DEVELOPER_POLICY", "arn:staging:dev"),
            ("ACCESS_SYNC_IDENTITY_PREFIX", "iam-"),
            ("ACCESS_SYNC_IDENTITY_MAX_ATTEMPTS", "3"),
            ("ACCESS_SYNC_IDENTITY_RETRY_DELAY_MS", "200"),
            ("ACCESS_SYNC_IDENTITY_RETRY_JITTER", "true"),
        ]));

        assert_eq!(config.policies.admin.as_str(), "arn:staging:admin");
        assert_eq!(config.policies.developer.as_str(), "arn:staging:dev");
        assert_eq!(config.naming.namespace_prefix, "user-");
        assert_eq!(config.naming.identity_prefix, "iam-");
        assert_eq!(config.identity_retry.max_attempts, 3);
        assert_eq!(config.identity_retry.initial_delay, Duration::from_millis(200));
        assert_eq!(config.identity_retry.max_delay, Duration::from_secs(30));
        assert!(config.identity_retry.jitter);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = SyncConfig::from_lookup(lookup(&[
            ("ACCESS_SYNC_IDENTITY_MAX_ATTEMPTS", "many"),
            ("ACCESS_SYNC_IDENTITY_RETRY_DELAY_MS", "-1"),
        ]));

        assert_eq!(config.identity_retry, RetryConfig::identity_default());
    }

    #[test]
    fn test_from_json_partial_document() {
        let config = SyncConfig::from_json(
            r#"{"policies": {"admin": "arn:prod:admin", "developer": "arn:prod:dev"}}"#,
        )
        .unwrap();

        assert_eq!(config.policies.admin.as_str(), "arn:prod:admin");
        assert_eq!(config.identity_retry.max_attempts, 5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SyncConfig::default();
        config.identity_retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = SyncConfig::default();
        config.policies.developer = PolicyId::new("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "policies.developer"
        ));
    }

    #[test]
    fn test_blank_environment_values_fall_back() {
        let config = SyncConfig::from_lookup(lookup(&[
            ("ACCESS_SYNC_ADMIN_POLICY", ""),
            ("ACCESS_SYNC_DEVELOPER_POLICY", "  "),
            ("ACCESS_SYNC_NAMESPACE_PREFIX", ""),
            ("ACCESS_SYNC_IDENTITY_PREFIX", " "),
        ]));

        assert_eq!(config, SyncConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_rejects_negative_exponential_base() {
        let result = SyncConfig::from_json(
            r#"{"identity_retry": {"max_attempts": 3, "initial_delay": {"secs": 1, "nanos": 0}, "max_delay": {"secs": 10, "nanos": 0}, "exponential_base": -2.0, "jitter": false}}"#,
        );

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key, .. }) if key == "identity_retry.exponential_base"
        ));
    }

    #[test]
    fn test_validate_rejects_unusable_backoff() {
        let mut config = SyncConfig::default();
        config.identity_retry.exponential_base = f64::NAN;
        assert!(config.validate().is_err());

        config.identity_retry.exponential_base = f64::INFINITY;
        assert!(config.validate().is_err());

        config.identity_retry.exponential_base = 0.5;
        assert!(config.validate().is_err());

        let mut config = SyncConfig::default();
        config.identity_retry.initial_delay = Duration::from_secs(5);
        config.identity_retry.max_delay = Duration::from_secs(1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "identity_retry.max_delay"
        ));

        let config = SyncConfig {
            identity_retry: RetryConfig::with_backoff(
                4,
                Duration::from_millis(100),
                Duration::from_secs(2),
            ),
            ..SyncConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            SyncConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
