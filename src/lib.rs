// This is a metapackage for tests
// The runnable simulator lives in the market-sim crate

/// Re-export the workspace crates for integration tests
pub use common;
pub use market_bus;
pub use market_service;
pub use stock_service;
