//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement the
//! acquisition and classification cycle.

mod acquisition;
mod monitor;
mod worker;

pub use acquisition::{select_latest, validate_entry, AcquisitionError, ReadingCache, ValidationError};
pub use monitor::{CycleOutcome, HealthReport, MonitorService};
pub use worker::{MonitorUpdate, RefreshWorker, RefreshWorkerHandle, DEFAULT_REFRESH_INTERVAL};
