//! Vacuum Task
//!
//! Background task that walks the whole store once per cycle, pausing between
//! keys so a pass is spread over roughly one cycle budget, removes expired
//! entries and finally reconciles the approximate counter.

use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheEngine, CycleReport};
use crate::config::EngineConfig;

// == Pacing ==
/// Smallest pause the vacuum ever takes, whatever the configuration.
const MIN_PAUSE: Duration = Duration::from_millis(1);

/// Per-key pause for a pass over `size` entries within `budget`.
///
/// Denser stores get shorter pauses. A store of zero or one entry waits the
/// whole budget. The floor is applied last, so the result never drops below
/// `floor`, even when the budget itself is smaller.
pub fn pacing_delay(size: usize, budget: Duration, floor: Duration) -> Duration {
    let per_key = if size <= 1 {
        budget
    } else {
        budget / u32::try_from(size).unwrap_or(u32::MAX)
    };
    per_key.max(floor)
}

// == Vacuum Scheduler ==
/// Drives vacuum passes over one engine until stopped.
#[derive(Debug)]
pub struct VacuumScheduler {
    engine: CacheEngine,
    budget: Duration,
    floor: Duration,
    shutdown: watch::Receiver<bool>,
}

impl VacuumScheduler {
    /// Creates a scheduler for `engine`, stopping once `shutdown` carries `true`
    /// or its sender is dropped.
    pub fn new(engine: CacheEngine, config: &EngineConfig, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            engine,
            budget: config.cycle_budget(),
            floor: config.min_pacing_delay.max(MIN_PAUSE),
            shutdown,
        }
    }

    /// Runs passes back to back until a stop is requested.
    pub async fn run(mut self) {
        info!(
            "Starting vacuum task with cycle budget of {:?} and pacing floor of {:?}",
            self.budget, self.floor
        );

        while let Some(report) = self.run_cycle().await {
            if report.evicted > 0 {
                info!(
                    "Vacuum: evicted {} of {} entries in {:?} (delay {:?}/key)",
                    report.evicted, report.scanned, report.elapsed, report.pacing_delay
                );
            } else {
                debug!(
                    "Vacuum: no expired entries among {} in {:?}",
                    report.scanned, report.elapsed
                );
            }
        }

        info!("Vacuum task stopped");
    }

    /// Performs one full pass. Returns `None` if a stop arrived mid-pass.
    pub async fn run_cycle(&mut self) -> Option<CycleReport> {
        if self.stop_requested() {
            return None;
        }

        let started = Instant::now();
        let keys = self.engine.snapshot_keys();
        let pacing_delay = pacing_delay(keys.len(), self.budget, self.floor);
        let mut report = CycleReport {
            scanned: keys.len(),
            pacing_delay,
            ..CycleReport::default()
        };

        if keys.is_empty() && !self.pause(pacing_delay).await {
            return None;
        }

        for key in &keys {
            if !self.pause(pacing_delay).await {
                return None;
            }

            match self.engine.evict_if_expired(key).await {
                Ok(true) => report.evicted += 1,
                Ok(false) => {}
                Err(err) => {
                    report.failed += 1;
                    warn!("Vacuum: failed to evict '{}': {}", key, err);
                }
            }
        }

        match self.engine.reconcile().await {
            Ok(exact) => report.reconciled = Some(exact),
            Err(err) => warn!("Vacuum: counter reconciliation failed, retrying next cycle: {}", err),
        }

        report.elapsed = started.elapsed();
        self.engine.metrics().record_vacuum_cycle(&report);
        Some(report)
    }

    fn stop_requested(&self) -> bool {
        *self.shutdown.borrow() || self.shutdown.has_changed().is_err()
    }

    /// Sleeps for `delay`. Returns `false` if a stop was requested meanwhile.
    async fn pause(&mut self, delay: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(delay) => !self.stop_requested(),
            changed = self.shutdown.changed() => changed.is_ok() && !*self.shutdown.borrow(),
        }
    }
}

// == Vacuum Handle ==
/// Owner of a running vacuum task. Dropping the handle also stops the task.
#[derive(Debug)]
pub struct VacuumHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl VacuumHandle {
    /// Signals the task to stop and waits for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            warn!("Vacuum task ended abnormally: {}", err);
        }
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns the vacuum for `engine`.
///
/// # Returns
/// A [`VacuumHandle`] used to stop the task during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_vacuum_task(engine.clone(), &config);
/// // Later, during shutdown:
/// handle.stop().await;
/// ```
#[must_use = "dropping the handle stops the vacuum"]
pub fn spawn_vacuum_task(engine: CacheEngine, config: &EngineConfig) -> VacuumHandle {
    let (shutdown, shutdown_rx) = watch::channel(false);
    let scheduler = VacuumScheduler::new(engine, config, shutdown_rx);

    VacuumHandle {
        shutdown,
        task: tokio::spawn(scheduler.run()),
    }
}
