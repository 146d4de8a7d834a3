use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{Error, Result};
use market_bus::{MarketBus, StockMessage};
use market_service::{ConsumerRunner, LogConsumer, RelayConsumer, StockConsumer};
use tokio::sync::watch;

/// Consumer that records every message it is offered
struct RecordingConsumer {
    seen: Mutex<Vec<StockMessage>>,
}

impl RecordingConsumer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<StockMessage> {
        self.seen.lock().unwrap().clone()
    }
}

impl StockConsumer for RecordingConsumer {
    fn on_stock(&self, message: &StockMessage) -> Result<()> {
        self.seen.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Consumer that rejects everything
struct FailingConsumer;

impl StockConsumer for FailingConsumer {
    fn on_stock(&self, _message: &StockMessage) -> Result<()> {
        Err(Error::Internal("handler exploded".to_string()))
    }
}

fn message(stock: &str, price: f32) -> StockMessage {
    StockMessage {
        stock: stock.to_string(),
        price,
    }
}

#[test]
fn test_log_consumer_accepts_any_message() {
    let consumer = LogConsumer;
    assert!(consumer.on_stock(&message("ZOOM", 12.5)).is_ok());
    // Duplicates are fine, every message stands on its own
    assert!(consumer.on_stock(&message("ZOOM", 12.5)).is_ok());
}

#[test]
fn test_relay_consumer_republishes_to_its_destination() {
    let bus = Arc::new(MarketBus::new());
    let relayed = bus.subscribe("audit-out-0");
    let relay = RelayConsumer::new(bus.clone(), "audit-out-0");

    relay.on_stock(&message("ORCL", 10.0)).unwrap();

    assert_eq!(relayed.receiver.recv().unwrap(), message("ORCL", 10.0));
}

#[test]
fn test_relay_over_closed_bus_reports_failure() {
    let bus = Arc::new(MarketBus::new());
    let relay = RelayConsumer::new(bus.clone(), "audit-out-0");
    bus.close();

    let result = relay.on_stock(&message("ORCL", 10.0));
    assert!(matches!(result, Err(Error::PublishFailed(_))));
}

#[tokio::test]
async fn test_runner_dispatches_to_every_consumer_in_order() {
    let bus = Arc::new(MarketBus::new());
    let first = RecordingConsumer::new();
    let second = RecordingConsumer::new();
    let runner = ConsumerRunner::subscribe(
        &bus,
        "new-stock-out-0",
        vec![first.clone(), second.clone()],
    );

    bus.publish("new-stock-out-0", message("ZOOM", 40.0)).unwrap();
    bus.publish("new-stock-out-0", message("ORCL", 10.0)).unwrap();
    bus.publish("new-stock-out-0", message("ZOOM", 20.0)).unwrap();

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(runner.run(rx));

    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send(true).unwrap();
    handle.await.unwrap();

    let expected = vec![
        message("ZOOM", 40.0),
        message("ORCL", 10.0),
        message("ZOOM", 20.0),
    ];
    assert_eq!(first.seen(), expected);
    assert_eq!(second.seen(), expected);
}

#[tokio::test]
async fn test_runner_offers_message_to_later_consumers_after_an_error() {
    let bus = Arc::new(MarketBus::new());
    let recorder = RecordingConsumer::new();
    let runner = ConsumerRunner::subscribe(
        &bus,
        "new-stock-out-0",
        vec![Arc::new(FailingConsumer), recorder.clone()],
    );

    bus.publish("new-stock-out-0", message("TSLA", 5.0)).unwrap();
    bus.publish("new-stock-out-0", message("TSLA", 2.5)).unwrap();

    // Already-signalled shutdown makes run() drain the queue and return
    let (_tx, rx) = watch::channel(true);
    runner.run(rx).await;

    assert_eq!(recorder.seen(), vec![message("TSLA", 5.0), message("TSLA", 2.5)]);
}

#[tokio::test]
async fn test_runner_drains_queued_messages_on_shutdown() {
    let bus = Arc::new(MarketBus::new());
    let recorder = RecordingConsumer::new();
    let runner = ConsumerRunner::subscribe(&bus, "new-stock-out-0", vec![recorder.clone()]);

    for price in [40.0, 20.0, 10.0] {
        bus.publish("new-stock-out-0", message("ORCL", price)).unwrap();
    }

    let (_tx, rx) = watch::channel(true);
    runner.run(rx).await;

    assert_eq!(recorder.seen().len(), 3);
}

#[tokio::test]
async fn test_runner_exits_when_the_bus_closes() {
    let bus = Arc::new(MarketBus::new());
    let recorder = RecordingConsumer::new();
    let runner = ConsumerRunner::subscribe(&bus, "new-stock-out-0", vec![recorder.clone()]);

    bus.publish("new-stock-out-0", message("ZOOM", 1.0)).unwrap();
    bus.close();

    // Never-signalled shutdown: the disconnect alone must end the loop
    let (_tx, rx) = watch::channel(false);
    runner.run(rx).await;

    assert_eq!(recorder.seen(), vec![message("ZOOM", 1.0)]);
}
