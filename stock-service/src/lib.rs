//! Stock service for the market simulator
//!
//! Owns the per-symbol price state and the tick pipeline that mutates it:
//! pick a symbol, derive the next price, commit the mutation, then release
//! the event to the bus. Publication is strictly after commit and is
//! best-effort; the committed price stands either way.

pub mod config;
pub mod movement;
pub mod publisher;
pub mod scheduler;
pub mod service;
pub mod store;

pub use config::StockServiceConfig;
pub use movement::TickGenerator;
pub use publisher::{BusPublisher, EventPublisher};
pub use scheduler::Scheduler;
pub use service::{StockService, TickOutcome};
pub use store::{InMemoryPriceStore, PriceStore};
