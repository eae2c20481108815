//! # Walls Telemetry
//!
//! Logging initialisation for the service binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use walls_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WALLS_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `WALLS_JSON_LOGS` | `true` in containers | JSON formatted output |
//! | `WALLS_CONSOLE_OUTPUT` | `true` | Emit to stdout at all |
//! | `Service__Name` | `walls-user-service` | Service name field |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    Install(String),
}
