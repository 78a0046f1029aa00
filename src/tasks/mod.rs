//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache engine.
//!
//! # Tasks
//! - Vacuum: sweeps expired entries at an adaptive pace and reconciles the
//!   approximate counter once per pass

mod vacuum;

pub use vacuum::{pacing_delay, spawn_vacuum_task, VacuumHandle, VacuumScheduler};
