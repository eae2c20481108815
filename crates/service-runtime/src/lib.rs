//! # Walls User Service Runtime
//!
//! Wires the account service and the OTP handshake onto one event bus and
//! runs the inbound subscriber loops.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and the explicitly built service graph
//! - `runtime` - Subscriber loop lifecycle and graceful shutdown
//!
//! ## Inbound Flow
//!
//! ```text
//! External OTP verifier ──OTPVALIDATEDEVENT:<TYPE>──→ Transport
//!                                                        │
//!                                            Dispatcher (registry check)
//!                                                        │
//!                                               OtpValidatedHandler
//!                                                        │
//!                                              UserAccountService
//!                                                        │
//!                                        USERCREATEDEVENT / USERUPDATEDEVENT
//! ```

pub mod container;
pub mod runtime;

pub use container::{ConfigError, ServiceConfig, ServiceContainer};
pub use runtime::ServiceRuntime;
