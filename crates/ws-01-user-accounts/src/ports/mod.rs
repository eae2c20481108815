//! Ports: the driving API and the driven document store.

pub mod inbound;
pub mod outbound;

pub use inbound::UserAccountsApi;
pub use outbound::UserRepository;
