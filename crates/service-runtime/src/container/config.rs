//! # Service Configuration
//!
//! Runtime parameters read from the environment, using the deployment's
//! variable names.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `Service__Name` | `walls-user-service` |
//! | `Service__Mode` | `development` |
//! | `EBConnection__ConnectionString` | empty |
//! | `WALLS_BUS_CAPACITY` | `1000` |
//! | `WALLS_SHUTDOWN_GRACE_MS` | `2000` |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use walls_telemetry::TelemetryConfig;

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service identity.
    pub service: ServiceIdentity,
    /// Event bus configuration.
    pub bus: BusConfig,
    /// How long shutdown waits for subscriber loops.
    pub shutdown_grace: Duration,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceIdentity::default(),
            bus: BusConfig::default(),
            shutdown_grace: Duration::from_millis(2000),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let telemetry = TelemetryConfig::from_env();

        Self {
            service: ServiceIdentity {
                name: telemetry.service_name.clone(),
                mode: env::var("Service__Mode").unwrap_or(defaults.service.mode),
            },
            bus: BusConfig {
                connection_string: env::var("EBConnection__ConnectionString")
                    .unwrap_or(defaults.bus.connection_string),
                capacity: parse_or(env::var("WALLS_BUS_CAPACITY").ok(), defaults.bus.capacity),
            },
            shutdown_grace: Duration::from_millis(parse_or(
                env::var("WALLS_SHUTDOWN_GRACE_MS").ok(),
                2000,
            )),
            telemetry,
        }
    }

    /// Reject configurations the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.name.trim().is_empty() {
            return Err(ConfigError::EmptyServiceName);
        }
        if self.bus.capacity == 0 {
            return Err(ConfigError::ZeroBusCapacity);
        }
        Ok(())
    }
}

/// Parse `value`, keeping `default` when it is absent or malformed.
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Configuration errors.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `Service__Name` is blank; it is stamped on every event as its source.
    EmptyServiceName,
    /// The broadcast transport cannot have zero capacity.
    ZeroBusCapacity,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyServiceName => {
                write!(f, "Service__Name must not be empty")
            }
            ConfigError::ZeroBusCapacity => {
                write!(f, "WALLS_BUS_CAPACITY must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Who this service is on the bus.
#[derive(Debug, Clone)]
pub struct ServiceIdentity {
    /// Written into every envelope as `event_source`.
    pub name: String,
    /// Deployment mode label.
    pub mode: String,
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self {
            name: walls_telemetry::DEFAULT_SERVICE_NAME.to_string(),
            mode: "development".to_string(),
        }
    }
}

/// Event bus configuration.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Address of the external pub/sub server. Logged only; the bundled
    /// transport is in-process.
    pub connection_string: String,
    /// Messages buffered per subscriber before it lags.
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        assert_eq!(config.service.name, "walls-user-service");
        assert_eq!(config.bus.capacity, 1000);
        assert_eq!(config.shutdown_grace, Duration::from_millis(2000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name_and_zero_capacity() {
        let mut config = ServiceConfig::default();
        config.service.name = "  ".into();
        assert_eq!(config.validate(), Err(ConfigError::EmptyServiceName));

        let mut config = ServiceConfig::default();
        config.bus.capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBusCapacity));
    }

    #[test]
    fn test_parse_or_keeps_default_on_garbage() {
        assert_eq!(parse_or(Some(" 64 ".into()), 1000usize), 64);
        assert_eq!(parse_or(Some("lots".into()), 1000usize), 1000);
        assert_eq!(parse_or(None, 2000u64), 2000);
    }
}
