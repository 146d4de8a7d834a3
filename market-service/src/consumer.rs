//! Consumers reacting to received stock events

use std::sync::Arc;

use common::error::Result;
use market_bus::{MarketBus, StockMessage};
use tracing::info;

/// Handler for one received stock event
///
/// Every message must be treated as self-contained: delivery may duplicate
/// events or interleave symbols in any order, and a handler error only
/// affects the message it was raised for.
pub trait StockConsumer: Send + Sync {
    /// React to one received message
    fn on_stock(&self, message: &StockMessage) -> Result<()>;
}

/// Consumer that logs every received event
pub struct LogConsumer;

impl StockConsumer for LogConsumer {
    fn on_stock(&self, message: &StockMessage) -> Result<()> {
        info!(
            "RECEIVED STOCK ==> {} NEW PRICE ==> {}",
            message.stock, message.price
        );
        Ok(())
    }
}

/// Consumer that forwards received events to another destination
pub struct RelayConsumer {
    /// Bus the relayed copies go back onto
    bus: Arc<MarketBus>,
    /// Destination the copies go out on
    destination: String,
}

impl RelayConsumer {
    /// Create a relay toward a destination
    pub fn new(bus: Arc<MarketBus>, destination: impl Into<String>) -> Self {
        Self {
            bus,
            destination: destination.into(),
        }
    }
}

impl StockConsumer for RelayConsumer {
    fn on_stock(&self, message: &StockMessage) -> Result<()> {
        self.bus.publish(&self.destination, message.clone())?;
        Ok(())
    }
}
