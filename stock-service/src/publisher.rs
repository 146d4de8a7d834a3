//! Outbound publication of committed events

use std::sync::Arc;

use async_trait::async_trait;
use common::error::Result;
use common::model::event::MarketEvent;
use market_bus::{MarketBus, StockMessage};
use tracing::debug;

/// Publisher trait for handing committed events downstream
///
/// Implementations must not mutate price state. A publish failure is
/// reported to the caller, who decides what to do with the already
/// committed mutation.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one committed event, returning the number of subscribers reached
    async fn publish(&self, event: &MarketEvent) -> Result<usize>;
}

/// Publisher releasing events onto the in-process market bus
pub struct BusPublisher {
    /// Bus shared with the consumer side
    bus: Arc<MarketBus>,
    /// Destination name events go out on
    destination: String,
}

impl BusPublisher {
    /// Create a publisher for a destination
    pub fn new(bus: Arc<MarketBus>, destination: impl Into<String>) -> Self {
        Self {
            bus,
            destination: destination.into(),
        }
    }

    /// Destination this publisher writes to
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

#[async_trait]
impl EventPublisher for BusPublisher {
    async fn publish(&self, event: &MarketEvent) -> Result<usize> {
        let message = StockMessage::from(event);
        let delivered = self.bus.publish(&self.destination, message)?;

        debug!(
            "Handed {} to {} subscriber(s) on {}",
            event.symbol, delivered, self.destination
        );
        Ok(delivered)
    }
}
