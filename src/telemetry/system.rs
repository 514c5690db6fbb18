//! System Sampling Module
//!
//! Periodically reads process and machine health through `sysinfo`: process
//! CPU and resident memory, system memory, load average, uptime and CPU
//! count. The most recent sample is cached so report endpoints can answer
//! without touching the OS. When the platform cannot report, the sample is
//! absent rather than invented.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use sysinfo::System;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// == System Sample ==
/// One point-in-time reading of process and machine state.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSample {
    pub timestamp: DateTime<Utc>,
    /// CPU share of this process, percent (can exceed 100 on multicore)
    pub process_cpu_pct: f32,
    /// Resident set of this process, MB
    pub process_memory_mb: u64,
    pub total_memory_mb: u64,
    pub free_memory_mb: u64,
    pub used_memory_mb: u64,
    /// used / total, percent
    pub memory_used_pct: f64,
    /// 1, 5 and 15 minute load averages
    pub load_average: [f64; 3],
    /// Machine uptime, seconds
    pub uptime_secs: u64,
    pub cpu_count: usize,
}

// == System Sampler ==
/// Wrapper around a `sysinfo::System` with a cached latest sample.
pub struct SystemSampler {
    system: Mutex<System>,
    latest: RwLock<Option<SystemSample>>,
}

impl SystemSampler {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new_all()),
            latest: RwLock::new(None),
        }
    }

    // == Sample ==
    /// Takes a fresh reading and caches it.
    ///
    /// Returns `None` when the current process cannot be inspected. CPU
    /// percentages need two readings to settle, so the first sample after
    /// startup reports zero CPU.
    pub fn sample(&self) -> Option<SystemSample> {
        let pid = sysinfo::get_current_pid().ok()?;

        let sample = {
            let mut system = self.system.lock();
            system.refresh_memory();
            system.refresh_cpu_usage();
            if !system.refresh_process(pid) {
                return None;
            }
            let process = system.process(pid)?;

            let total = system.total_memory();
            let free = system.free_memory();
            let used = system.used_memory();
            let memory_used_pct = if total == 0 {
                0.0
            } else {
                used as f64 / total as f64 * 100.0
            };
            let load = System::load_average();

            SystemSample {
                timestamp: Utc::now(),
                process_cpu_pct: process.cpu_usage(),
                process_memory_mb: bytes_to_mb(process.memory()),
                total_memory_mb: bytes_to_mb(total),
                free_memory_mb: bytes_to_mb(free),
                used_memory_mb: bytes_to_mb(used),
                memory_used_pct,
                load_average: [load.one, load.five, load.fifteen],
                uptime_secs: System::uptime(),
                cpu_count: system.cpus().len(),
            }
        };

        *self.latest.write() = Some(sample.clone());
        Some(sample)
    }

    // == Latest ==
    /// Returns the cached sample without touching the OS.
    pub fn latest(&self) -> Option<SystemSample> {
        self.latest.read().clone()
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemSampler")
            .field("latest", &self.latest.read())
            .finish_non_exhaustive()
    }
}

fn bytes_to_mb(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_MB).round() as u64
}
