//! Common types and utilities for the market simulator
//!
//! This library contains the shared types used across the simulator services.
//! It provides a unified approach to error handling and the domain models the
//! producer and consumer sides exchange.

pub mod error;
pub mod model;

/// Re-export important types
pub use error::{Error, ErrorExt, Result};
pub use model::event::{CommitReceipt, MarketEvent};
pub use model::stock::{Price, PriceRecord, Symbol};
