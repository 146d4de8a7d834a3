//! Configuration for the stock service

use std::env;
use std::time::Duration;

use common::error::{Error, Result};

/// Destination committed events go out on
pub const DEFAULT_DESTINATION: &str = "new-stock-out-0";

/// Default time between ticks, in milliseconds
pub const DEFAULT_TICK_PERIOD_MS: u64 = 800;

/// Symbols tracked when none are configured
pub const DEFAULT_SYMBOLS: [&str; 3] = ["ZOOM", "ORCL", "TSLA"];

/// Configuration for the stock service
#[derive(Debug, Clone)]
pub struct StockServiceConfig {
    /// Symbols eligible for price movement
    pub symbols: Vec<String>,
    /// Time between ticks, in milliseconds
    pub tick_period_ms: u64,
    /// Destination committed events go out on
    pub destination: String,
    /// Fixed seed for reproducible runs; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for StockServiceConfig {
    fn default() -> Self {
        Self {
            symbols: env::var("STOCK_SYMBOLS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()),
            tick_period_ms: env::var("TICK_PERIOD_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TICK_PERIOD_MS),
            destination: env::var("STOCK_DESTINATION")
                .unwrap_or_else(|_| DEFAULT_DESTINATION.to_string()),
            seed: env::var("STOCK_SEED").ok().and_then(|s| s.parse().ok()),
        }
    }
}

impl StockServiceConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a new configuration with custom values
    pub fn new(symbols: Vec<String>, tick_period_ms: u64, destination: String) -> Self {
        Self {
            symbols,
            tick_period_ms,
            destination,
            seed: None,
        }
    }

    /// Check the configuration for values the simulator cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(Error::ConfigurationError(
                "at least one symbol is required".to_string(),
            ));
        }

        for (index, symbol) in self.symbols.iter().enumerate() {
            if symbol.is_empty() {
                return Err(Error::ConfigurationError(
                    "symbol names must not be empty".to_string(),
                ));
            }
            if self.symbols[..index].contains(symbol) {
                return Err(Error::ConfigurationError(format!(
                    "symbol {} is listed twice",
                    symbol
                )));
            }
        }

        if self.tick_period_ms == 0 {
            return Err(Error::ConfigurationError(
                "tick period must be positive".to_string(),
            ));
        }

        if self.destination.is_empty() {
            return Err(Error::ConfigurationError(
                "destination must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Tick period as a [`Duration`]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}
