//! Per-service health classification
//!
//! Derives a discrete health status for each logical service from its
//! aggregated statistics over the full retained history. Health records are
//! never stored, they are recomputed on every query.

use crate::aggregator;
use crate::events::{HealthStatus, ServiceHealth};
use crate::store::EventStore;
use chrono::Utc;

/// Average latency above this many milliseconds marks a service degraded
const DEGRADED_LATENCY_MS: u64 = 500;
/// Uptime below this percentage marks a service down
const DOWN_UPTIME_PERCENT: f64 = 95.0;
/// Uptime below this percentage marks a service degraded
const DEGRADED_UPTIME_PERCENT: f64 = 99.0;

/// Evaluate the health of one service from its full retained history
///
/// `uptime_percentage` is defined as `100 - error_rate`. Status precedence,
/// first match wins:
///
/// 1. uptime < 95 -> down
/// 2. uptime < 99 or avg latency > 500ms -> degraded
/// 3. otherwise -> healthy
///
/// Both comparisons are strict, so a service at exactly 95.0% uptime and
/// exactly 500ms average latency is degraded, not down.
pub fn evaluate(store: &EventStore, service_name: &str) -> ServiceHealth {
    let stats = aggregator::snapshot(store, None, Some(service_name));
    let uptime = 100.0 - stats.error_rate;

    let status = if uptime < DOWN_UPTIME_PERCENT {
        HealthStatus::Down
    } else if uptime < DEGRADED_UPTIME_PERCENT || stats.avg_latency_ms > DEGRADED_LATENCY_MS {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    ServiceHealth {
        service_name: service_name.to_string(),
        status,
        uptime_percentage: uptime,
        avg_latency_ms: stats.avg_latency_ms,
        error_rate: stats.error_rate,
        last_check: Utc::now(),
    }
}

/// Evaluate health for a list of services, preserving the input order
pub fn evaluate_all<S: AsRef<str>>(store: &EventStore, service_names: &[S]) -> Vec<ServiceHealth> {
    service_names
        .iter()
        .map(|name| evaluate(store, name.as_ref()))
        .collect()
}
