//! Drain loop dispatching bus messages to consumers

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::TryRecvError;
use market_bus::{MarketBus, Subscription};
use tokio::sync::watch;
use tracing::{error, info};

use crate::consumer::StockConsumer;

/// How long to idle when the subscriber queue is empty
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runner draining one subscription into a set of consumers
pub struct ConsumerRunner {
    /// Subscription being drained
    subscription: Subscription,
    /// Consumers invoked for every message, in order
    consumers: Vec<Arc<dyn StockConsumer>>,
}

impl ConsumerRunner {
    /// Subscribe to a destination and attach consumers to it
    pub fn subscribe(
        bus: &MarketBus,
        destination: &str,
        consumers: Vec<Arc<dyn StockConsumer>>,
    ) -> Self {
        let subscription = bus.subscribe(destination);
        info!(
            "Attached {} consumer(s) to {}",
            consumers.len(),
            destination
        );

        Self {
            subscription,
            consumers,
        }
    }

    /// Run until shutdown is signalled or the bus goes away
    ///
    /// A consumer error is logged and the message is still offered to the
    /// remaining consumers; the loop never stops over one bad message. On
    /// shutdown, messages already queued are drained before returning.
    pub async fn run(self, shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                // Deliver what the producer handed over before it stopped
                while let Ok(message) = self.subscription.receiver.try_recv() {
                    self.dispatch(&message);
                }
                break;
            }

            match self.subscription.receiver.try_recv() {
                Ok(message) => self.dispatch(&message),
                Err(TryRecvError::Empty) => tokio::time::sleep(POLL_INTERVAL).await,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        info!("Consumer loop for {} stopped", self.subscription.destination);
    }

    fn dispatch(&self, message: &market_bus::StockMessage) {
        for consumer in &self.consumers {
            if let Err(e) = consumer.on_stock(message) {
                error!("Consumer error for {}: {}", message.stock, e);
            }
        }
    }
}
