//! Request DTOs for the service API
//!
//! Defines the structure of incoming HTTP request bodies.

use regex::Regex;
use serde::Deserialize;

/// Request body for bulk invalidation (POST /cache/clear)
///
/// # Fields
/// - `pattern`: Optional regular expression; matching keys are removed.
///   Without a pattern the whole cache is cleared.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearRequest {
    /// Optional key pattern
    #[serde(default)]
    pub pattern: Option<String>,
}

impl ClearRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(pattern) = &self.pattern {
            if pattern.is_empty() {
                return Some("Pattern cannot be empty".to_string());
            }
            if Regex::new(pattern).is_err() {
                return Some(format!("Invalid pattern: {}", pattern));
            }
        }
        None
    }
}
