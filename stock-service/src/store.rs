//! Price store holding the last known price per symbol

use async_trait::async_trait;
use chrono::Utc;
use common::error::{Error, Result};
use common::model::stock::{Price, PriceRecord, Symbol};
use dashmap::DashMap;
use rand::Rng;

/// Scale applied to the uniform draw when seeding an initial price
pub const SEED_PRICE_SCALE: f64 = 100.9;

/// Price store trait defining the interface for per-symbol price state
///
/// The store holds exactly one record per listed symbol. Listing happens
/// once at construction; `get` and `set` on anything else fail with
/// [`Error::SymbolNotFound`].
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Get the current record for a symbol
    async fn get(&self, symbol: &str) -> Result<PriceRecord>;

    /// Overwrite the price of a listed symbol, returning the new record
    async fn set(&self, symbol: &str, price: Price) -> Result<PriceRecord>;

    /// All listed symbols, in no particular order
    fn symbols(&self) -> Vec<Symbol>;
}

/// In-memory price store
pub struct InMemoryPriceStore {
    /// Records by symbol
    records: DashMap<Symbol, PriceRecord>,
}

impl InMemoryPriceStore {
    /// Create a store with randomized initial prices, one per symbol
    ///
    /// Initial prices are uniform in `[0, SEED_PRICE_SCALE)`.
    pub fn seeded(symbols: &[Symbol], rng: &mut impl Rng) -> Self {
        let records = DashMap::new();
        for symbol in symbols {
            let price = rng.gen::<f64>() * SEED_PRICE_SCALE;
            records.insert(symbol.clone(), PriceRecord::new(symbol.clone(), price));
        }

        Self { records }
    }

    /// Create a store with explicit initial prices
    pub fn with_prices(prices: &[(&str, Price)]) -> Self {
        let records = DashMap::new();
        for (symbol, price) in prices {
            records.insert(symbol.to_string(), PriceRecord::new(*symbol, *price));
        }

        Self { records }
    }
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    /// Get the current record for a symbol
    async fn get(&self, symbol: &str) -> Result<PriceRecord> {
        self.records
            .get(symbol)
            .map(|r| r.clone())
            .ok_or_else(|| Error::SymbolNotFound(symbol.to_string()))
    }

    /// Overwrite the price of a listed symbol
    async fn set(&self, symbol: &str, price: Price) -> Result<PriceRecord> {
        match self.records.get_mut(symbol) {
            Some(mut record) => {
                record.price = price;
                record.updated_at = Utc::now();
                Ok(record.clone())
            }
            None => Err(Error::SymbolNotFound(symbol.to_string())),
        }
    }

    /// All listed symbols
    fn symbols(&self) -> Vec<Symbol> {
        self.records.iter().map(|entry| entry.key().clone()).collect()
    }
}
