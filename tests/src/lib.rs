//! # Walls User Service Test Suite
//!
//! Cross-crate tests that drive the account service, the OTP handshake and
//! the runtime together over the in-memory bus.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── otp_flow.rs       # Validated OTP deliveries through the dispatcher
//!     ├── authorization.rs  # Device/phone binding across both services
//!     └── transfers.rs      # Admission control and transfer forwarding
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p walls-tests
//! cargo test -p walls-tests integration::otp_flow::
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
