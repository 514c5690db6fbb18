//! Configuration Module
//!
//! Handles loading and managing service configuration from environment
//! variables. Every tuning knob of the cache, budget and telemetry
//! subsystems can be overridden at startup; unset or unparsable variables
//! fall back to the documented defaults.

use std::env;

/// Service configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default cache TTL in seconds for writes without an explicit TTL
    pub cache_default_ttl: u64,
    /// TTL in seconds for session-scoped cache entries
    pub session_ttl: u64,
    /// TTL in seconds for cached GET responses
    pub response_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// System sampling interval in seconds
    pub sample_interval: u64,
    /// Latency in milliseconds above which an operation counts as slow
    pub slow_threshold_ms: u64,
    /// Maximum live one-shot callbacks
    pub timer_cap: usize,
    /// Maximum live repeating callbacks
    pub interval_cap: usize,
    /// Maximum live listener registrations
    pub listener_cap: usize,
    /// Maximum entries in the budget side cache
    pub budget_cache_cap: usize,
    /// TTL in seconds for budget side cache entries
    pub budget_cache_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DEFAULT_TTL` - Default cache TTL in seconds (default: 300)
    /// - `SESSION_TTL` - Session entry TTL in seconds (default: 1800)
    /// - `RESPONSE_CACHE_TTL` - Cached GET response TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `SAMPLE_INTERVAL` - System sampling frequency in seconds (default: 5)
    /// - `SLOW_THRESHOLD_MS` - Slow-operation threshold in ms (default: 1000)
    /// - `TIMER_CAP` - One-shot callback budget (default: 10)
    /// - `INTERVAL_CAP` - Repeating callback budget (default: 5)
    /// - `LISTENER_CAP` - Listener registration budget (default: 20)
    /// - `BUDGET_CACHE_CAP` - Budget side cache capacity (default: 50)
    /// - `BUDGET_CACHE_TTL` - Budget side cache TTL in seconds (default: 300)
    pub fn from_env() -> Self {
        Self {
            server_port: env_or("SERVER_PORT", 3000),
            cache_default_ttl: env_or("CACHE_DEFAULT_TTL", 300),
            session_ttl: env_or("SESSION_TTL", 1800),
            response_ttl: env_or("RESPONSE_CACHE_TTL", 300),
            sweep_interval: env_or("SWEEP_INTERVAL", 60),
            sample_interval: env_or("SAMPLE_INTERVAL", 5),
            slow_threshold_ms: env_or("SLOW_THRESHOLD_MS", 1000),
            timer_cap: env_or("TIMER_CAP", 10),
            interval_cap: env_or("INTERVAL_CAP", 5),
            listener_cap: env_or("LISTENER_CAP", 20),
            budget_cache_cap: env_or("BUDGET_CACHE_CAP", 50),
            budget_cache_ttl: env_or("BUDGET_CACHE_TTL", 300),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_default_ttl: 300,
            session_ttl: 1800,
            response_ttl: 300,
            sweep_interval: 60,
            sample_interval: 5,
            slow_threshold_ms: 1000,
            timer_cap: 10,
            interval_cap: 5,
            listener_cap: 20,
            budget_cache_cap: 50,
            budget_cache_ttl: 300,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
