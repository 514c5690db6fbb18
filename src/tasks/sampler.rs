//! System Sampling Task
//!
//! Background task that refreshes the performance monitor's host-level
//! reading on a fixed cadence, so report endpoints never block on the OS.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::telemetry::PerformanceMonitor;

/// Spawns a background task that periodically samples system metrics.
///
/// Each tick refreshes CPU, memory and load readings and caches them on
/// the monitor. On platforms where process introspection is unavailable
/// the task keeps running and the cached sample stays empty.
///
/// # Arguments
/// * `monitor` - Shared reference to the performance monitor
/// * `sample_interval_secs` - Interval in seconds between samples
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_sampler_task(
    monitor: Arc<PerformanceMonitor>,
    sample_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sample_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting system sampling task with interval of {} seconds",
            sample_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            match monitor.sample_system() {
                Some(sample) => debug!(
                    memory_used_pct = sample.memory_used_pct,
                    process_memory_mb = sample.process_memory_mb,
                    "System sample taken"
                ),
                None => debug!("System sampling unavailable on this platform"),
            }
        }
    })
}
