//! # User Accounts (ws-01)
//!
//! Owns the user aggregate: profile, company profiles, badges, wallet
//! settings, payment instruments, KYC documents, the bound device and
//! contacts. Every change is persisted as a full-document replace and then
//! announced on the bus.
//!
//! ## Architecture
//!
//! ```text
//! request boundary ──┐
//!                    ├──→ UserAccountsApi ──→ fetch → guard → mutate → persist ──→ EventPublisher
//! OTP handshake ─────┘                                            │
//!                                                        UserRepository
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Device binding | Guarded writes require the claimed device and phone to match the stored ones |
//! | 2 | No partial writes | A failed guard, lookup or rule persists nothing |
//! | 3 | Exclusive defaults | At most one default bank, card and badge per scope |
//! | 4 | Unique tags | A walls tag belongs to at most one badge across all users |
//! | 5 | Unique device | A device is bound to at most one user |
//! | 6 | Persist before publish | Events go out only after the store accepted the write |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Guard, admission control, collection rules, request and event shapes
//! - `ports/` - `UserAccountsApi` (inbound) and `UserRepository` (outbound)
//! - `service.rs` - The mutation pipeline implementing the API
//! - `adapters/` - In-memory document store
//!
//! ## Usage
//!
//! ```ignore
//! use ws_01_user_accounts::{InMemoryUserRepository, UserAccountService, UserAccountsApi};
//!
//! let service = UserAccountService::new(Arc::new(InMemoryUserRepository::new()), publisher);
//! let reference = service.create_user(CreateUser { phone }, &claim).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryUserRepository;
pub use domain::errors::{AccountError, AdmissionError, AuthorizationFailure};
pub use domain::payloads::*;
pub use domain::requests::*;
pub use ports::inbound::UserAccountsApi;
pub use ports::outbound::UserRepository;
pub use service::UserAccountService;
