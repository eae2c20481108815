//! # Service Runtime
//!
//! ## Startup Sequence
//!
//! 1. Build the service container
//! 2. Spawn one subscriber loop per accepted channel pattern
//! 3. Run until the shutdown signal
//!
//! ## Shutdown Sequence
//!
//! 1. Flip the shutdown watch
//! 2. Wait up to the grace period for each loop to stop
//! 3. Log per-loop counters

use std::sync::Arc;

use shared_bus::{DispatchStats, Dispatcher};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::container::{ServiceConfig, ServiceContainer};

type LoopHandle = JoinHandle<Result<DispatchStats, shared_bus::BusError>>;

/// Owns the container and the subscriber loops.
pub struct ServiceRuntime {
    container: Arc<ServiceContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    loops: Vec<(String, LoopHandle)>,
}

impl ServiceRuntime {
    pub fn new(config: ServiceConfig) -> Self {
        info!("Creating Walls user service runtime");

        let container = Arc::new(ServiceContainer::new(config));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            container,
            shutdown_tx,
            shutdown_rx,
            loops: Vec::new(),
        }
    }

    /// Spawn the subscriber loops. Returns how many were started.
    pub fn start(&mut self) -> usize {
        info!("===========================================");
        info!("  Walls User Service v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let handler = self.container.otp_validated_handler();
        let registry = Arc::clone(&self.container.registry);

        for pattern in registry.patterns() {
            let dispatcher = Dispatcher::new(pattern, Arc::clone(&registry), Arc::clone(&handler));
            let transport = self.container.bus();
            let shutdown = self.shutdown_rx.clone();

            let handle = tokio::spawn(dispatcher.run(transport, shutdown));
            self.loops.push((pattern.to_string(), handle));
        }

        if !self.container.config.bus.connection_string.is_empty() {
            info!(
                connection = %self.container.config.bus.connection_string,
                "External bus configured; running with in-process transport"
            );
        }
        info!(subscriptions = self.loops.len(), "Subscriber loops started");
        self.loops.len()
    }

    /// Signal every loop to stop and wait for them within the grace period.
    pub async fn shutdown(self) -> Vec<DispatchStats> {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let grace = self.container.config.shutdown_grace;
        let mut stats = Vec::with_capacity(self.loops.len());
        for (pattern, handle) in self.loops {
            match tokio::time::timeout(grace, handle).await {
                Ok(Ok(Ok(loop_stats))) => {
                    info!(
                        pattern = %pattern,
                        received = loop_stats.received,
                        handled = loop_stats.handled,
                        rejected = loop_stats.rejected,
                        failed = loop_stats.failed,
                        "Subscriber loop stopped"
                    );
                    stats.push(loop_stats);
                }
                Ok(Ok(Err(e))) => error!(pattern = %pattern, error = %e, "Subscriber loop failed"),
                Ok(Err(e)) => error!(pattern = %pattern, error = %e, "Subscriber loop panicked"),
                Err(_) => warn!(pattern = %pattern, "Subscriber loop did not stop within grace period"),
            }
        }

        info!("Shutdown complete");
        stats
    }

    /// Get a reference to the service container.
    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }
}
