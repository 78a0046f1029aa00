//! Approximate Entry Counter
//!
//! Writers enqueue signed deltas on a bounded channel; one aggregator task
//! applies them in order to a lock-protected integer. The vacuum periodically
//! overwrites the value with an exact count.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{CacheError, Result};

/// Upper bound on commands applied under a single write-lock acquisition.
const MAX_BATCH: usize = 1024;

#[derive(Debug)]
enum CounterCommand {
    Delta(i64),
    Reconcile(i64),
    Settle(oneshot::Sender<i64>),
}

// == Counter ==
/// Low-contention, eventually consistent count of live entries.
///
/// Cloning yields another producer for the same aggregator. The aggregator
/// stops once every clone has been dropped.
#[derive(Debug, Clone)]
pub struct Counter {
    tx: mpsc::Sender<CounterCommand>,
    value: Arc<RwLock<i64>>,
}

impl Counter {
    // == Constructor ==
    /// Starts the aggregator task with room for `capacity` outstanding deltas.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn(capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let value = Arc::new(RwLock::new(0));

        let handle = tokio::spawn(aggregate(rx, Arc::clone(&value)));

        (Self { tx, value }, handle)
    }

    /// Enqueues `+1`. Waits for queue capacity rather than dropping the delta.
    pub async fn increment(&self) -> Result<()> {
        self.send(CounterCommand::Delta(1)).await
    }

    /// Enqueues `-1`. Waits for queue capacity rather than dropping the delta.
    pub async fn decrement(&self) -> Result<()> {
        self.send(CounterCommand::Delta(-1)).await
    }

    /// Returns the current approximate value.
    pub async fn read(&self) -> i64 {
        *self.value.read().await
    }

    /// Overwrites the value with `exact`.
    ///
    /// The command travels through the same queue as the deltas, so every
    /// delta enqueued before it is applied first and then superseded.
    pub async fn reconcile(&self, exact: i64) -> Result<()> {
        self.send(CounterCommand::Reconcile(exact)).await
    }

    /// Waits until every command enqueued so far has been applied and returns
    /// the resulting value.
    pub async fn settle(&self) -> Result<i64> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(CounterCommand::Settle(ack_tx)).await?;
        ack_rx.await.map_err(|_| CacheError::CounterUnavailable)
    }

    async fn send(&self, command: CounterCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| CacheError::CounterUnavailable)
    }
}

// == Aggregator ==
async fn aggregate(mut rx: mpsc::Receiver<CounterCommand>, value: Arc<RwLock<i64>>) {
    while let Some(first) = rx.recv().await {
        let mut guard = value.write().await;
        apply(&mut guard, first);

        // Drain whatever else is already queued without re-taking the lock
        for _ in 1..MAX_BATCH {
            match rx.try_recv() {
                Ok(command) => apply(&mut guard, command),
                Err(_) => break,
            }
        }
    }

    debug!("Counter aggregator stopped: all producers dropped");
}

fn apply(value: &mut i64, command: CounterCommand) {
    match command {
        CounterCommand::Delta(delta) => *value += delta,
        CounterCommand::Reconcile(exact) => *value = exact,
        CounterCommand::Settle(ack) => {
            // The waiter may have given up; nothing to do then
            let _ = ack.send(*value);
        }
    }
}
