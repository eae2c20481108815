//! # Service Container
//!
//! Builds every service once, explicitly, and hands the same instances to
//! the request boundary and to the subscriber loops. There is no global
//! service handle.

pub mod config;

use std::sync::Arc;

use shared_bus::{ChannelRegistry, EventPublisher, InMemoryTransport, Transport};
use tracing::info;
use ws_01_user_accounts::{InMemoryUserRepository, UserAccountService};
use ws_02_otp_handshake::{OtpHandshakeService, OtpValidatedHandler};

pub use config::{BusConfig, ConfigError, ServiceConfig, ServiceIdentity};

/// The account service as wired by this runtime.
pub type Accounts = UserAccountService<InMemoryUserRepository>;

/// Holds the wired service graph.
pub struct ServiceContainer {
    pub config: ServiceConfig,
    pub transport: Arc<InMemoryTransport>,
    pub repository: Arc<InMemoryUserRepository>,
    pub accounts: Arc<Accounts>,
    pub otp: Arc<OtpHandshakeService<Accounts>>,
    pub registry: Arc<ChannelRegistry>,
}

impl ServiceContainer {
    pub fn new(config: ServiceConfig) -> Self {
        let transport = Arc::new(InMemoryTransport::with_capacity(config.bus.capacity));
        let publisher = EventPublisher::new(transport.clone(), config.service.name.clone());

        let repository = Arc::new(InMemoryUserRepository::new());
        let accounts = Arc::new(UserAccountService::new(repository.clone(), publisher.clone()));
        let otp = Arc::new(OtpHandshakeService::new(accounts.clone(), publisher));
        let registry = Arc::new(ChannelRegistry::default());

        info!(
            service = %config.service.name,
            mode = %config.service.mode,
            patterns = registry.len(),
            "Service container initialized"
        );

        Self {
            config,
            transport,
            repository,
            accounts,
            otp,
            registry,
        }
    }

    /// The transport as the bus sees it.
    #[must_use]
    pub fn bus(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    /// Handler for validated OTP deliveries.
    #[must_use]
    pub fn otp_validated_handler(&self) -> Arc<OtpValidatedHandler<Accounts>> {
        Arc::new(OtpValidatedHandler::new(self.accounts.clone()))
    }
}
