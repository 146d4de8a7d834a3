//! Stock service implementation
//!
//! The service is the transactional boundary of the simulator. A price
//! mutation first commits to the store; only a successful commit yields a
//! [`CommitReceipt`], and only a receipt can be published. A failed commit
//! therefore never leaks an event, and a failed publish never rolls back
//! the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use common::error::{ErrorExt, Result};
use common::model::event::{CommitReceipt, MarketEvent};
use common::model::stock::Price;
use tracing::{debug, info, warn};

use crate::publisher::EventPublisher;
use crate::store::PriceStore;

/// Outcome of one applied tick
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// Mutation committed and the event reached the bus
    Published(CommitReceipt),
    /// Mutation committed but the event was lost; the new price stands
    PublishFailed(CommitReceipt),
}

impl TickOutcome {
    /// Receipt of the committed mutation, present in every outcome
    pub fn receipt(&self) -> &CommitReceipt {
        match self {
            TickOutcome::Published(receipt) => receipt,
            TickOutcome::PublishFailed(receipt) => receipt,
        }
    }

    /// Whether the event reached the bus
    pub fn is_published(&self) -> bool {
        matches!(self, TickOutcome::Published(_))
    }
}

/// Stock service guarding price mutations and their release
pub struct StockService {
    /// Store holding per-symbol price state
    store: Arc<dyn PriceStore>,
    /// Publisher for committed events
    publisher: Arc<dyn EventPublisher>,
    /// Commit sequence counter
    sequence: AtomicU64,
}

impl StockService {
    /// Create a new stock service
    pub fn new(store: Arc<dyn PriceStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            publisher,
            sequence: AtomicU64::new(0),
        }
    }

    /// Commit a price mutation
    ///
    /// On success the store already holds the new price and the returned
    /// receipt carries the event to publish. On failure the store is
    /// untouched and no event exists.
    pub async fn commit(&self, symbol: &str, price: Price) -> Result<CommitReceipt> {
        let record = self
            .store
            .set(symbol, price)
            .await
            .with_context(|| format!("Price mutation rejected for {}", symbol))?;

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Committed {} at {} (seq {})", record.symbol, record.price, sequence);

        Ok(CommitReceipt {
            event: MarketEvent::from(&record),
            sequence,
            committed_at: record.updated_at,
        })
    }

    /// Commit a price mutation and release its event
    ///
    /// Publication is best-effort: a lost event is reported in the outcome
    /// but does not undo the commit.
    pub async fn apply(&self, symbol: &str, price: Price) -> Result<TickOutcome> {
        let receipt = self.commit(symbol, price).await?;
        info!(
            "STOCK ==> {} NEW PRICE ==> {}",
            receipt.event.symbol, receipt.event.price
        );

        match self.publisher.publish(&receipt.event).await {
            Ok(_delivered) => Ok(TickOutcome::Published(receipt)),
            Err(e) => {
                warn!(
                    "Keeping committed price for {}, publish failed: {}",
                    receipt.event.symbol, e
                );
                Ok(TickOutcome::PublishFailed(receipt))
            }
        }
    }
}
