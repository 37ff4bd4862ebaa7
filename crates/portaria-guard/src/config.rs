//! Configuration management for the guard layer.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults. This follows the 12-factor app pattern.
//!
//! # Example
//!
//! ```ignore
//! use portaria_guard::config::GuardConfig;
//!
//! // Load from file with env overrides
//! let config = GuardConfig::load("config.yaml")?;
//!
//! // Or load from environment only
//! let config = GuardConfig::from_env()?;
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use portaria_domain::error::DomainError;
use portaria_domain::resolver::{
    ResolverConfig, RouteTable, DEFAULT_PROTECTED_PREFIXES, DEFAULT_PUBLIC_PREFIXES,
};
use serde::{Deserialize, Serialize};

use crate::flight::{CREATION_FLIGHT_TIMEOUT, DEFAULT_FLIGHT_TIMEOUT, SESSION_FLIGHT_TIMEOUT};

/// Guard layer configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct GuardConfig {
    /// Route classification settings
    #[serde(default)]
    pub routes: RouteSettings,

    /// Single-flight timeout settings
    #[serde(default)]
    pub flight: FlightSettings,

    /// Resolver settings
    #[serde(default)]
    pub resolver: ResolverSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Route classification settings.
///
/// The prefix lists come from the config file; scalar settings elsewhere
/// can additionally be overridden via `PORTARIA_`-prefixed environment
/// variables with `__` as the nested key separator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteSettings {
    /// Route prefixes reachable without a session
    #[serde(default = "default_public_prefixes")]
    pub public_prefixes: Vec<String>,

    /// Route prefixes requiring at least one active role grant
    #[serde(default = "default_protected_prefixes")]
    pub protected_prefixes: Vec<String>,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            public_prefixes: default_public_prefixes(),
            protected_prefixes: default_protected_prefixes(),
        }
    }
}

fn default_public_prefixes() -> Vec<String> {
    DEFAULT_PUBLIC_PREFIXES
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_protected_prefixes() -> Vec<String> {
    DEFAULT_PROTECTED_PREFIXES
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Single-flight timeout tiers, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FlightSettings {
    /// Timeout for generic resource fetches
    #[serde(default = "default_flight_timeout_ms")]
    pub default_timeout_ms: u64,

    /// Timeout for session validation
    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: u64,

    /// Timeout for multi-step creation flows
    #[serde(default = "default_creation_timeout_ms")]
    pub creation_timeout_ms: u64,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_flight_timeout_ms(),
            session_timeout_ms: default_session_timeout_ms(),
            creation_timeout_ms: default_creation_timeout_ms(),
        }
    }
}

impl FlightSettings {
    /// Timeout for generic resource fetches.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Timeout for session validation.
    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_ms)
    }

    /// Timeout for multi-step creation flows.
    pub fn creation_timeout(&self) -> Duration {
        Duration::from_millis(self.creation_timeout_ms)
    }
}

fn default_flight_timeout_ms() -> u64 {
    DEFAULT_FLIGHT_TIMEOUT.as_millis() as u64
}

fn default_session_timeout_ms() -> u64 {
    SESSION_FLIGHT_TIMEOUT.as_millis() as u64
}

fn default_creation_timeout_ms() -> u64 {
    CREATION_FLIGHT_TIMEOUT.as_millis() as u64
}

/// Resolver settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ResolverSettings {
    /// Evaluations slower than this emit a warning, in milliseconds
    #[serde(default = "default_slow_eval_threshold_ms")]
    pub slow_eval_threshold_ms: u64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            slow_eval_threshold_ms: default_slow_eval_threshold_ms(),
        }
    }
}

fn default_slow_eval_threshold_ms() -> u64 {
    5
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl From<DomainError> for ConfigLoadError {
    fn from(err: DomainError) -> Self {
        ConfigLoadError::Invalid {
            message: err.to_string(),
        }
    }
}

impl GuardConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `PORTARIA_` and use `__` as
    /// separator. For example:
    /// - `PORTARIA_LOGGING__LEVEL=debug` overrides `logging.level`
    /// - `PORTARIA_FLIGHT__DEFAULT_TIMEOUT_MS=2000` overrides `flight.default_timeout_ms`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&GuardConfig::default())?)
            // Add config file
            .add_source(File::from(path).format(FileFormat::Yaml))
            // Add environment variables with PORTARIA_ prefix
            .add_source(
                Environment::with_prefix("PORTARIA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let guard_config: GuardConfig = config.try_deserialize()?;
        guard_config.validate()?;

        Ok(guard_config)
    }

    /// Load configuration from environment variables only.
    ///
    /// Uses default values and allows overrides via `PORTARIA_` prefixed env vars.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&GuardConfig::default())?)
            .add_source(
                Environment::with_prefix("PORTARIA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let guard_config: GuardConfig = config.try_deserialize()?;
        guard_config.validate()?;

        Ok(guard_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        // Route prefixes must form a valid table
        self.route_table()?;

        // Timeouts must be finite and non-zero
        for (name, value) in [
            ("flight.default_timeout_ms", self.flight.default_timeout_ms),
            ("flight.session_timeout_ms", self.flight.session_timeout_ms),
            (
                "flight.creation_timeout_ms",
                self.flight.creation_timeout_ms,
            ),
        ] {
            if value == 0 {
                return Err(ConfigLoadError::Invalid {
                    message: format!("{name} must be greater than 0"),
                });
            }
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }

    /// Builds the validated route table from the configured prefixes.
    pub fn route_table(&self) -> Result<RouteTable, ConfigLoadError> {
        Ok(RouteTable::new(
            self.routes.public_prefixes.clone(),
            self.routes.protected_prefixes.clone(),
        )?)
    }

    /// Builds a resolver configuration from these settings.
    ///
    /// The onboarding probe is not configurable here; attach one with
    /// [`ResolverConfig::with_onboarding_probe`] when the onboarding
    /// persistence layer provides it.
    pub fn resolver_config(&self) -> Result<ResolverConfig, ConfigLoadError> {
        Ok(ResolverConfig::default()
            .with_route_table(self.route_table()?)
            .with_slow_eval_threshold(Duration::from_millis(
                self.resolver.slow_eval_threshold_ms,
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portaria_domain::resolver::RouteClass;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Test: Can load config from YAML file
    #[test]
    #[serial]
    fn test_can_load_config_from_yaml_file() {
        // Create a temp YAML config file
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
routes:
  public_prefixes: ["/", "/auth", "/sobre"]
  protected_prefixes: ["/agenda"]

flight:
  default_timeout_ms: 2000
  session_timeout_ms: 1000

resolver:
  slow_eval_threshold_ms: 10

logging:
  level: debug
  json: true
"#
        )
        .unwrap();

        // Load config from file
        let config = GuardConfig::load(file.path()).unwrap();

        // Verify values were loaded
        assert_eq!(config.routes.public_prefixes.len(), 3);
        assert_eq!(config.routes.protected_prefixes, vec!["/agenda"]);
        assert_eq!(config.flight.default_timeout_ms, 2000);
        assert_eq!(config.flight.session_timeout_ms, 1000);
        // Untouched keys keep their defaults
        assert_eq!(config.flight.creation_timeout_ms, 10_000);
        assert_eq!(config.resolver.slow_eval_threshold_ms, 10);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);

        let table = config.route_table().unwrap();
        assert_eq!(table.classify("/sobre"), RouteClass::Public);
        assert_eq!(table.classify("/agenda/hoje"), RouteClass::RoleProtected);
    }

    /// Test: Can override config with env vars
    #[test]
    #[serial]
    fn test_can_override_config_with_env_vars() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
logging:
  level: info
"#
        )
        .unwrap();

        // Set environment variables to override
        std::env::set_var("PORTARIA_LOGGING__LEVEL", "warn");
        std::env::set_var("PORTARIA_FLIGHT__DEFAULT_TIMEOUT_MS", "2500");

        // Load config (env vars should override file values)
        let config = GuardConfig::load(file.path()).unwrap();

        // Clean up env vars
        std::env::remove_var("PORTARIA_LOGGING__LEVEL");
        std::env::remove_var("PORTARIA_FLIGHT__DEFAULT_TIMEOUT_MS");

        // Verify env var overrides
        assert_eq!(config.logging.level, "warn"); // Overridden by env
        assert_eq!(config.flight.default_timeout_ms, 2500); // Overridden by env
        assert_eq!(config.flight.default_timeout(), Duration::from_millis(2500));
    }

    /// Test: Config validation catches errors
    #[test]
    fn test_config_validation_catches_errors() {
        // Test invalid route prefix
        let mut config = GuardConfig::default();
        config.routes.public_prefixes = vec!["clients".to_string()];
        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("route prefix"));

        // Test prefix in both sets
        let mut config = GuardConfig::default();
        config.routes.public_prefixes = vec!["/agenda".to_string()];
        config.routes.protected_prefixes = vec!["/agenda".to_string()];
        let result = config.validate();
        assert!(result.is_err());

        // Test zero timeout
        let mut config = GuardConfig::default();
        config.flight.session_timeout_ms = 0;
        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("session_timeout_ms"));

        // Test invalid log level
        let mut config = GuardConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    /// Test: Invalid config returns clear error
    #[test]
    fn test_invalid_config_returns_clear_error() {
        // Test file not found
        let result = GuardConfig::load("/nonexistent/path/config.yaml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigLoadError::FileNotFound { .. }));
        assert!(err.to_string().contains("not found"));

        // Test invalid YAML syntax
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid: yaml: syntax: [").unwrap();

        let result = GuardConfig::load(file.path());
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigLoadError::Load(_)));
    }

    /// Test: Default config is valid
    #[test]
    fn test_default_config_is_valid() {
        let config = GuardConfig::default();
        assert!(config.validate().is_ok());

        // Check default values
        assert_eq!(config.flight.default_timeout_ms, 5000);
        assert_eq!(config.flight.session_timeout_ms, 3000);
        assert_eq!(config.flight.creation_timeout_ms, 10_000);
        assert_eq!(config.resolver.slow_eval_threshold_ms, 5);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);

        let resolver_config = config.resolver_config().unwrap();
        assert_eq!(
            resolver_config.slow_eval_threshold,
            Duration::from_millis(5)
        );
    }

    /// Test: from_env loads defaults with env overrides
    #[test]
    #[serial]
    fn test_from_env_loads_defaults_with_env_overrides() {
        std::env::set_var("PORTARIA_LOGGING__LEVEL", "trace");

        let config = GuardConfig::from_env().unwrap();

        std::env::remove_var("PORTARIA_LOGGING__LEVEL");

        // Should have default timeouts but overridden level
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.flight.default_timeout_ms, 5000); // default
    }
}
