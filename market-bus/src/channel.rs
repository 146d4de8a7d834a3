//! Channel fan-out for stock event distribution
//!
//! Destinations are plain string names (e.g., "new-stock-out-0"). Each
//! subscriber gets its own unbounded queue, so a slow consumer never blocks
//! the producer and never steals messages from its peers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crossbeam_channel::{self, Receiver, Sender};
use uuid::Uuid;

use common::{Error, Result};

use crate::models::StockMessage;

/// Subscription entry
struct SubscriptionEntry {
    /// Sender channel
    sender: Sender<StockMessage>,
    /// Subscription ID
    id: Uuid,
}

/// Handle returned to a subscriber
pub struct Subscription {
    /// Subscription ID, usable with [`MarketBus::unsubscribe`]
    pub id: Uuid,
    /// Destination this subscription listens on
    pub destination: String,
    /// Receiving end of the subscriber queue
    pub receiver: Receiver<StockMessage>,
}

/// In-process bus fanning events out to destination subscribers
pub struct MarketBus {
    /// Senders by destination
    senders: RwLock<HashMap<String, Vec<SubscriptionEntry>>>,
    /// Set once the owning process starts shutting down
    closed: AtomicBool,
}

impl MarketBus {
    /// Create a new bus with no destinations
    pub fn new() -> Self {
        Self {
            senders: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Subscribe to a destination
    pub fn subscribe(&self, destination: &str) -> Subscription {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let subscription_id = Uuid::new_v4();

        let mut senders = self.senders.write().unwrap();
        senders
            .entry(destination.to_string())
            .or_default()
            .push(SubscriptionEntry {
                sender,
                id: subscription_id,
            });

        Subscription {
            id: subscription_id,
            destination: destination.to_string(),
            receiver,
        }
    }

    /// Publish a message to every subscriber of a destination
    ///
    /// Returns the number of subscribers the message was handed to. A
    /// destination nobody listens on delivers to zero subscribers and is
    /// not an error. Publishing on a closed bus is.
    pub fn publish(&self, destination: &str, message: StockMessage) -> Result<usize> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::PublishFailed(format!(
                "bus is closed, dropping event for {}",
                destination
            )));
        }

        let mut senders = self.senders.write().unwrap();
        if let Some(entries) = senders.get_mut(destination) {
            // Send to all subscribers, dropping the ones that went away
            let mut delivered = 0;
            entries.retain(|entry| match entry.sender.send(message.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            });

            Ok(delivered)
        } else {
            Ok(0)
        }
    }

    /// Unsubscribe using subscription ID
    pub fn unsubscribe(&self, subscription_id: Uuid) -> bool {
        let mut senders = self.senders.write().unwrap();
        let mut found = false;

        for entries in senders.values_mut() {
            let initial_len = entries.len();
            entries.retain(|entry| entry.id != subscription_id);

            if entries.len() < initial_len {
                found = true;
            }
        }

        found
    }

    /// Number of live subscriptions on a destination
    pub fn subscriber_count(&self, destination: &str) -> usize {
        let senders = self.senders.read().unwrap();
        senders.get(destination).map_or(0, |entries| entries.len())
    }

    /// Close the bus
    ///
    /// Subsequent publishes fail, and dropping the retained senders lets
    /// every subscriber observe a disconnect once its queue drains.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let mut senders = self.senders.write().unwrap();
        senders.clear();
        tracing::info!("Market bus closed");
    }

    /// Whether the bus has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for MarketBus {
    fn default() -> Self {
        Self::new()
    }
}
