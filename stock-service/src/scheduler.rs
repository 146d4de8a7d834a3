//! Recurring tick scheduling tied to the process lifecycle

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::movement::TickGenerator;

/// Scheduler driving the tick generator at a fixed period
///
/// The first tick fires immediately, the rest one period apart. A tick
/// that runs long delays the schedule instead of overlapping it.
pub struct Scheduler {
    /// Generator invoked once per tick
    generator: Arc<TickGenerator>,
    /// Time between ticks
    period: Duration,
}

impl Scheduler {
    /// Create a scheduler for a generator
    pub fn new(generator: Arc<TickGenerator>, period: Duration) -> Self {
        Self { generator, period }
    }

    /// Run until shutdown is signalled
    ///
    /// The shutdown flag is only observed between ticks, so an in-flight
    /// tick always runs to completion. Tick failures are contained: they
    /// are logged and the next tick fires as scheduled.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Scheduler started with period {:?}", self.period);
        loop {
            tokio::select! {
                // Check shutdown before an overdue tick when both are ready
                biased;
                _ = shutdown.changed() => {
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.generator.run_tick().await {
                        error!("Tick aborted: {}", e);
                    }
                }
            }
        }
        info!("Scheduler stopped");
    }
}
