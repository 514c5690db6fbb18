//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache Sweep: Removes expired cache entries at configured intervals
//! - System Sampling: Refreshes host-level metrics for the monitor

mod sampler;
mod sweep;

pub use sampler::spawn_sampler_task;
pub use sweep::spawn_sweep_task;
