//! Wire models exchanged over the bus

use common::model::event::MarketEvent;
use serde::{Deserialize, Serialize};

/// Stock event message as consumers receive it
///
/// The payload carries the symbol and the new price and nothing else.
/// Prices narrow to single precision on the wire; the store keeps full
/// double precision internally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMessage {
    /// Stock symbol
    pub stock: String,
    /// New price after the committed mutation
    pub price: f32,
}

impl From<&MarketEvent> for StockMessage {
    fn from(event: &MarketEvent) -> Self {
        Self {
            stock: event.symbol.clone(),
            price: event.price as f32,
        }
    }
}
