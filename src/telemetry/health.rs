//! Health Scoring Module
//!
//! Reduces the live metrics to a 0-100 health score plus advisory text.
//! Deduction tiers stack: an average response time past both the 500 ms and
//! 1000 ms marks loses both tier amounts, and likewise for error rate and
//! memory pressure. The hit-rate adjustment is a bonus above 0.8 and a
//! penalty below 0.5. The final score is clamped to [0, 100].

use serde::Serialize;

/// Score at or above which the service reports healthy.
pub const HEALTHY_FLOOR: i32 = 80;

/// Score at or above which the service reports degraded rather than
/// unhealthy.
pub const DEGRADED_FLOOR: i32 = 50;

// == Health Inputs ==
/// Everything the scorer looks at.
#[derive(Debug, Clone)]
pub struct HealthInputs {
    /// Average response time over the recent window, milliseconds
    pub avg_response_ms: f64,
    /// Failed requests / total requests, 0..1
    pub error_rate: f64,
    /// System memory in use, percent; `None` when sampling is unavailable
    pub memory_used_pct: Option<f64>,
    /// Cache hits / (hits + misses), 0..1
    pub cache_hit_rate: f64,
    /// Slow queries currently retained
    pub slow_query_count: usize,
}

// == Health Report ==
/// Score, status word and advisory text.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub score: u8,
    pub status: String,
    pub recommendations: Vec<String>,
}

// == Health Score ==
/// Computes the additive-tier health score.
pub fn health_score(inputs: &HealthInputs) -> u8 {
    let mut score: i32 = 100;

    // Response-time tiers stack
    if inputs.avg_response_ms > 500.0 {
        score -= 20;
    }
    if inputs.avg_response_ms > 1000.0 {
        score -= 30;
    }

    // Error-rate tiers stack
    if inputs.error_rate > 0.05 {
        score -= 25;
    }
    if inputs.error_rate > 0.10 {
        score -= 40;
    }

    // Memory tiers stack; unknown memory deducts nothing
    if let Some(memory_used_pct) = inputs.memory_used_pct {
        if memory_used_pct > 80.0 {
            score -= 15;
        }
        if memory_used_pct > 90.0 {
            score -= 25;
        }
    }

    // Hit-rate adjustment
    if inputs.cache_hit_rate > 0.8 {
        score += 10;
    }
    if inputs.cache_hit_rate < 0.5 {
        score -= 10;
    }

    score.clamp(0, 100) as u8
}

// == Health Status ==
/// Maps a score to its status word.
pub fn health_status(score: u8) -> &'static str {
    if i32::from(score) >= HEALTHY_FLOOR {
        "healthy"
    } else if i32::from(score) >= DEGRADED_FLOOR {
        "degraded"
    } else {
        "unhealthy"
    }
}

// == Recommendations ==
/// Advisory text for the current inputs.
pub fn recommendations(inputs: &HealthInputs) -> Vec<String> {
    let mut advice = Vec::new();

    if inputs.avg_response_ms > 500.0 {
        advice.push(
            "Average response time is high: cache more endpoints or tighten slow queries"
                .to_string(),
        );
    }
    if inputs.error_rate > 0.05 {
        advice.push("Error rate is elevated: inspect recent failed requests".to_string());
    }
    if let Some(memory_used_pct) = inputs.memory_used_pct {
        if memory_used_pct > 80.0 {
            advice.push(
                "Memory usage is high: release idle resources or lower cache TTLs".to_string(),
            );
        }
    }
    if inputs.cache_hit_rate < 0.5 {
        advice.push(
            "Cache hit rate is low: revisit TTLs and key coverage for hot paths".to_string(),
        );
    }
    if inputs.slow_query_count > 10 {
        advice.push(
            "Many slow queries recorded: review indexes and query shapes".to_string(),
        );
    }

    if advice.is_empty() {
        advice.push("All monitored metrics are within normal ranges".to_string());
    }

    advice
}

// == Health Report ==
/// Convenience wrapper building the full report from inputs.
pub fn health_report(inputs: &HealthInputs) -> HealthReport {
    let score = health_score(inputs);
    HealthReport {
        score,
        status: health_status(score).to_string(),
        recommendations: recommendations(inputs),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_inputs() -> HealthInputs {
        HealthInputs {
            avg_response_ms: 50.0,
            error_rate: 0.0,
            memory_used_pct: Some(40.0),
            cache_hit_rate: 0.9,
            slow_query_count: 0,
        }
    }

    #[test]
    fn test_quiet_system_scores_full_marks() {
        // 100 + 10 hit-rate bonus, clamped to 100
        assert_eq!(health_score(&quiet_inputs()), 100);
        assert_eq!(health_status(100), "healthy");
    }

    #[test]
    fn test_first_response_tier() {
        let inputs = HealthInputs {
            avg_response_ms: 600.0,
            ..quiet_inputs()
        };
        assert_eq!(health_score(&inputs), 90); // -20 +10
    }

    #[test]
    fn test_response_tiers_stack() {
        let inputs = HealthInputs {
            avg_response_ms: 1200.0,
            ..quiet_inputs()
        };
        // Both the 500 ms and 1000 ms tiers apply: -20 -30 +10
        assert_eq!(health_score(&inputs), 60);
    }

    #[test]
    fn test_error_tiers_stack() {
        let moderate = HealthInputs {
            error_rate: 0.07,
            ..quiet_inputs()
        };
        assert_eq!(health_score(&moderate), 85); // -25 +10

        let severe = HealthInputs {
            error_rate: 0.12,
            ..quiet_inputs()
        };
        assert_eq!(health_score(&severe), 45); // -25 -40 +10
    }

    #[test]
    fn test_memory_tiers_stack() {
        let high = HealthInputs {
            memory_used_pct: Some(85.0),
            ..quiet_inputs()
        };
        assert_eq!(health_score(&high), 95); // -15 +10

        let critical = HealthInputs {
            memory_used_pct: Some(95.0),
            ..quiet_inputs()
        };
        assert_eq!(health_score(&critical), 70); // -15 -25 +10
    }

    #[test]
    fn test_unknown_memory_deducts_nothing() {
        let inputs = HealthInputs {
            memory_used_pct: None,
            ..quiet_inputs()
        };
        assert_eq!(health_score(&inputs), 100);
    }

    #[test]
    fn test_low_hit_rate_penalty() {
        let inputs = HealthInputs {
            cache_hit_rate: 0.3,
            ..quiet_inputs()
        };
        assert_eq!(health_score(&inputs), 90); // -10
    }

    #[test]
    fn test_middling_hit_rate_is_neutral() {
        let inputs = HealthInputs {
            cache_hit_rate: 0.65,
            ..quiet_inputs()
        };
        assert_eq!(health_score(&inputs), 100);
    }

    #[test]
    fn test_worst_case_clamps_to_zero() {
        let inputs = HealthInputs {
            avg_response_ms: 5000.0,
            error_rate: 0.5,
            memory_used_pct: Some(99.0),
            cache_hit_rate: 0.0,
            slow_query_count: 40,
        };
        assert_eq!(health_score(&inputs), 0);
        assert_eq!(health_status(0), "unhealthy");
    }

    #[test]
    fn test_status_boundaries() {
        assert_eq!(health_status(80), "healthy");
        assert_eq!(health_status(79), "degraded");
        assert_eq!(health_status(50), "degraded");
        assert_eq!(health_status(49), "unhealthy");
    }

    #[test]
    fn test_quiet_system_gets_all_clear_advice() {
        let advice = recommendations(&quiet_inputs());
        assert_eq!(advice.len(), 1);
        assert!(advice[0].contains("normal"));
    }

    #[test]
    fn test_each_problem_gets_its_advice() {
        let inputs = HealthInputs {
            avg_response_ms: 800.0,
            error_rate: 0.08,
            memory_used_pct: Some(90.0),
            cache_hit_rate: 0.2,
            slow_query_count: 15,
        };

        let advice = recommendations(&inputs);
        assert_eq!(advice.len(), 5);
    }

    #[test]
    fn test_report_composition() {
        let report = health_report(&quiet_inputs());
        assert_eq!(report.score, 100);
        assert_eq!(report.status, "healthy");
        assert!(!report.recommendations.is_empty());
    }
}
