//! Market simulator runner
//!
//! Wires the producer pipeline (store, commit gate, publisher, scheduler)
//! and the consumer loop onto one in-process bus, then runs both until a
//! shutdown signal arrives.

use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use market_bus::MarketBus;
use market_service::{ConsumerRunner, LogConsumer, StockConsumer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stock_service::{
    BusPublisher, InMemoryPriceStore, PriceStore, Scheduler, StockService, StockServiceConfig,
    TickGenerator,
};
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Tick period in milliseconds (overrides TICK_PERIOD_MS)
    #[clap(long)]
    period_ms: Option<u64>,

    /// Seed for reproducible runs (overrides STOCK_SEED)
    #[clap(long)]
    seed: Option<u64>,

    /// Comma-separated symbols to simulate (overrides STOCK_SYMBOLS)
    #[clap(long)]
    symbols: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing with debug level if DEBUG=1 in .env
    let env_debug = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env_debug == "1" { Level::DEBUG } else { Level::INFO };

    // Create an environment filter
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse("stock_service=debug,market_service=debug,market_bus=debug")
        .unwrap();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();

    // Only set the global subscriber if it hasn't been set already
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        info!("Tracing initialized");
        if env_debug == "1" {
            debug!("Debug logging enabled");
        }
    }

    info!("Starting market simulator...");

    // Environment configuration with command line overrides
    let mut config = StockServiceConfig::from_env();
    if let Some(period_ms) = args.period_ms {
        config.tick_period_ms = period_ms;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(symbols) = args.symbols {
        config.symbols = symbols
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    config.validate()?;

    // Seed the store, reproducibly when a seed was given
    let mut seed_rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let store = Arc::new(InMemoryPriceStore::seeded(&config.symbols, &mut seed_rng));

    // Wire the producer pipeline onto the bus
    let bus = Arc::new(MarketBus::new());
    let publisher = Arc::new(BusPublisher::new(bus.clone(), config.destination.clone()));
    let service = Arc::new(StockService::new(
        store.clone() as Arc<dyn PriceStore>,
        publisher,
    ));
    let generator = match config.seed {
        // Offset keeps the movement stream distinct from the seeding stream
        Some(seed) => TickGenerator::with_seed(
            store.clone() as Arc<dyn PriceStore>,
            service,
            config.symbols.clone(),
            seed.wrapping_add(1),
        ),
        None => TickGenerator::new(
            store.clone() as Arc<dyn PriceStore>,
            service,
            config.symbols.clone(),
        ),
    };
    let scheduler = Scheduler::new(Arc::new(generator), config.tick_period());

    // Wire the consumer loop onto the same destination
    let consumers: Vec<Arc<dyn StockConsumer>> = vec![Arc::new(LogConsumer)];
    let runner = ConsumerRunner::subscribe(&bus, &config.destination, consumers);

    // Run both sides until a shutdown signal arrives
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx.clone()));
    let runner_handle = tokio::spawn(runner.run(shutdown_rx));

    info!(
        "Simulating {} symbols on {}, one tick every {:?}",
        config.symbols.len(),
        config.destination,
        config.tick_period()
    );

    shutdown_signal().await;

    // Stop ticking first so the last event still finds an open bus
    shutdown_tx.send(true).ok();
    scheduler_handle.await?;
    bus.close();
    runner_handle.await?;

    info!("Shutting down");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
