//! Event models emitted by the producer side

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::stock::{Price, PriceRecord, Symbol};

/// Snapshot of one committed price mutation
///
/// The event is immutable once created: downstream consumers may duplicate
/// or reorder deliveries, so the event carries everything needed to act on
/// it in isolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Stock symbol the mutation applied to
    pub symbol: Symbol,
    /// Price after the mutation
    pub price: Price,
}

impl From<&PriceRecord> for MarketEvent {
    fn from(record: &PriceRecord) -> Self {
        Self {
            symbol: record.symbol.clone(),
            price: record.price,
        }
    }
}

/// Proof that a price mutation reached the store
///
/// A receipt only exists for committed mutations. Publication takes the
/// receipt as input, which keeps the release of an event strictly after its
/// commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// The event released by this commit
    pub event: MarketEvent,
    /// Monotonic commit sequence number, starting at 1
    pub sequence: u64,
    /// Timestamp the store accepted the mutation
    pub committed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_snapshots_record_state() {
        let record = PriceRecord::new("TSLA", 200.0);
        let event = MarketEvent::from(&record);
        assert_eq!(event.symbol, "TSLA");
        assert_eq!(event.price, 200.0);
    }

    #[test]
    fn event_serializes_symbol_and_price() {
        let event = MarketEvent {
            symbol: "ORCL".to_string(),
            price: 50.0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["symbol"], "ORCL");
        assert_eq!(json["price"], 50.0);
    }
}
