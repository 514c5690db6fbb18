//! QuickPe Cache - in-process caching and telemetry for a wallet backend
//!
//! Provides a TTL cache with hashed keys and large-payload encoding, a
//! resource budget for timers, intervals and listeners, performance
//! monitoring with health scoring, and cached query helpers, plus a small
//! HTTP surface for reports and administration.

pub mod api;
pub mod budget;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod tasks;
pub mod telemetry;

pub use api::AppState;
pub use budget::ResourceBudget;
pub use cache::AdvancedCache;
pub use config::Config;
pub use query::QueryLayer;
pub use tasks::{spawn_sampler_task, spawn_sweep_task};
pub use telemetry::PerformanceMonitor;
