//! Alert rule definitions and breach predicates
//!
//! An alert rule carries a human-readable `condition` string for display, but
//! breach detection is done through a typed predicate so that it is testable
//! and never depends on parsing the description.

use crate::events::{DashboardStats, ServiceHealth, Severity, Timestamp};
use serde::{Deserialize, Serialize};

/// Typed breach predicate for an alert rule
///
/// Each variant names the aggregate field the rule's threshold is compared
/// against. The rule's `condition` string stays purely informational.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertPredicate {
    /// Breach when average latency exceeds the threshold (milliseconds)
    AvgLatencyAbove,
    /// Breach when the error rate percentage exceeds the threshold
    ErrorRateAbove,
    /// Breach when any service's uptime percentage falls below the threshold
    UptimeBelow,
}

impl AlertPredicate {
    /// Whether current aggregates breach the given threshold
    pub fn breach(
        &self,
        threshold: f64,
        stats: &DashboardStats,
        health: &[ServiceHealth],
    ) -> bool {
        match self {
            AlertPredicate::AvgLatencyAbove => stats.avg_latency_ms as f64 > threshold,
            AlertPredicate::ErrorRateAbove => stats.error_rate > threshold,
            AlertPredicate::UptimeBelow => {
                health.iter().any(|h| h.uptime_percentage < threshold)
            }
        }
    }
}

/// A user-toggleable alert rule with engine-computed trigger state
///
/// `enabled` changes only via an explicit toggle; `triggered` and
/// `last_triggered` change only during an alert engine evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRule {
    /// Unique rule identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Human-readable description of the condition, never parsed or executed
    pub condition: String,
    /// Threshold the predicate compares against
    pub threshold: f64,
    pub severity: Severity,
    /// Whether the rule participates in evaluation
    pub enabled: bool,
    /// Current breach state as of the last evaluation
    pub triggered: bool,
    /// When the rule last transitioned into the triggered state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_triggered: Option<Timestamp>,
    /// Typed predicate used for breach detection
    pub predicate: AlertPredicate,
}

impl AlertRule {
    /// Create an enabled, untriggered rule
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        condition: impl Into<String>,
        threshold: f64,
        severity: Severity,
        predicate: AlertPredicate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            condition: condition.into(),
            threshold,
            severity,
            enabled: true,
            triggered: false,
            last_triggered: None,
            predicate,
        }
    }
}

/// The fixed rule set created at process start
pub fn seed_rules() -> Vec<AlertRule> {
    vec![
        AlertRule::new(
            "1",
            "High Latency Alert",
            "avg_latency > 500ms",
            500.0,
            Severity::Warning,
            AlertPredicate::AvgLatencyAbove,
        ),
        AlertRule::new(
            "2",
            "Error Rate Alert",
            "error_rate > 5%",
            5.0,
            Severity::Critical,
            AlertPredicate::ErrorRateAbove,
        ),
        AlertRule::new(
            "3",
            "Service Down Alert",
            "uptime < 95%",
            95.0,
            Severity::Critical,
            AlertPredicate::UptimeBelow,
        ),
    ]
}
