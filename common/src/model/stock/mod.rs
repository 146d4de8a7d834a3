//! Stock models and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Symbol identifying a tracked stock (e.g., "ORCL")
pub type Symbol = String;

/// Price carried with full double precision inside the simulator.
/// Only the outbound wire format narrows to `f32`.
pub type Price = f64;

/// Last known state of one stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Stock symbol
    pub symbol: Symbol,
    /// Last committed price
    pub price: Price,
    /// Timestamp of the last committed mutation
    pub updated_at: DateTime<Utc>,
}

impl PriceRecord {
    /// Create a record for a freshly listed symbol
    pub fn new(symbol: impl Into<Symbol>, price: Price) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            updated_at: Utc::now(),
        }
    }
}
