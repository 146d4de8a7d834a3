//! In-process message bus for distributing committed stock events

pub mod channel;
mod models;

pub use channel::{MarketBus, Subscription};
pub use models::StockMessage;
