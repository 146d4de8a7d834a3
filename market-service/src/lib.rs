//! Market service consuming published stock events
//!
//! The consumer side is fully decoupled from the producer: it only sees
//! messages that arrive on the bus, tolerates duplicates and reordering,
//! and keeps no state the producer depends on.

pub mod consumer;
pub mod runner;

pub use consumer::{LogConsumer, RelayConsumer, StockConsumer};
pub use runner::ConsumerRunner;
