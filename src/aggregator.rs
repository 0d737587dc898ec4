//! Rolling statistics over the event store
//!
//! Computes count, average latency, error rate, and active-service counts over
//! a sliding time window and an optional service filter. Every computation is
//! an idempotent read: the result depends only on the store contents and the
//! wall clock at call time.

use crate::events::DashboardStats;
use crate::store::{EventFilter, EventStore};
use chrono::{Duration, Utc};
use std::collections::HashSet;

/// Compute an aggregate snapshot over the store
///
/// Selects events with `timestamp >= now - window_seconds` (no time bound when
/// `window_seconds` is `None`), optionally restricted to one service, and
/// reduces them to a `DashboardStats`.
///
/// # Arguments
///
/// * `store` - The event store to read from
/// * `window_seconds` - Sliding window length, or `None` for full retained history
/// * `service` - Optional service-name filter
pub fn snapshot(
    store: &EventStore,
    window_seconds: Option<i64>,
    service: Option<&str>,
) -> DashboardStats {
    let mut filter = EventFilter::new();
    if let Some(window) = window_seconds {
        filter = filter.since(Utc::now() - Duration::seconds(window));
    }
    if let Some(service) = service {
        filter = filter.service(service);
    }

    let selected = store.query(&filter);
    if selected.is_empty() {
        // Division by zero is defined, not an error: everything is zero
        return DashboardStats::empty();
    }

    let total = selected.len();
    let errors = selected.iter().filter(|e| e.is_error()).count();
    let latency_sum: f64 = selected.iter().map(|e| e.latency_ms).sum();
    let services: HashSet<&str> = selected.iter().map(|e| e.service_name.as_str()).collect();

    DashboardStats {
        total_requests: total,
        avg_latency_ms: (latency_sum / total as f64).round() as u64,
        error_rate: round2(100.0 * errors as f64 / total as f64),
        active_services: services.len(),
    }
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{RequestEvent, Timestamp};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn create_test_event(
        service: &str,
        status_code: u16,
        latency_ms: f64,
        timestamp: Timestamp,
    ) -> RequestEvent {
        RequestEvent {
            id: Uuid::new_v4(),
            timestamp,
            service_name: service.to_string(),
            endpoint: "/api/products".to_string(),
            method: "GET".to_string(),
            status_code,
            latency_ms,
            error_message: if status_code >= 400 {
                Some(format!("Error {}", status_code))
            } else {
                None
            },
        }
    }

    #[test]
    fn test_snapshot_empty_selection_is_all_zero() {
        let store = EventStore::new(100);
        let stats = snapshot(&store, Some(300), None);
        assert_eq!(stats, DashboardStats::empty());
    }

    #[test]
    fn test_snapshot_counts_and_average() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        store
            .append(create_test_event("api-gateway", 200, 100.0, now))
            .unwrap();
        store
            .append(create_test_event("auth-service", 201, 200.0, now))
            .unwrap();
        store
            .append(create_test_event("api-gateway", 200, 300.0, now))
            .unwrap();

        let stats = snapshot(&store, Some(300), None);
        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.avg_latency_ms, 200);
        assert_eq!(stats.error_rate, 0.0);
        assert_eq!(stats.active_services, 2);
    }

    #[test]
    fn test_snapshot_average_rounds_to_nearest() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        store
            .append(create_test_event("api-gateway", 200, 100.0, now))
            .unwrap();
        store
            .append(create_test_event("api-gateway", 200, 101.0, now))
            .unwrap();

        // Mean 100.5 rounds up
        let stats = snapshot(&store, None, None);
        assert_eq!(stats.avg_latency_ms, 101);
    }

    #[test]
    fn test_snapshot_error_rate_two_decimals() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        // 3 errors out of 37 events: 100 * 3 / 37 = 8.108... -> 8.11
        for i in 0..37 {
            let status = if i < 3 { 500 } else { 200 };
            store
                .append(create_test_event("api-gateway", status, 100.0, now))
                .unwrap();
        }

        let stats = snapshot(&store, Some(300), None);
        assert_eq!(stats.error_rate, 8.11);
    }

    #[test]
    fn test_snapshot_window_excludes_old_events() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        store
            .append(create_test_event(
                "api-gateway",
                500,
                900.0,
                now - Duration::seconds(600),
            ))
            .unwrap();
        store
            .append(create_test_event("api-gateway", 200, 100.0, now))
            .unwrap();

        let stats = snapshot(&store, Some(300), None);
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.avg_latency_ms, 100);
        assert_eq!(stats.error_rate, 0.0);

        // No window picks up the full retained history
        let full = snapshot(&store, None, None);
        assert_eq!(full.total_requests, 2);
        assert_eq!(full.error_rate, 50.0);
    }

    #[test]
    fn test_snapshot_service_filter() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        store
            .append(create_test_event("checkout", 500, 400.0, now))
            .unwrap();
        store
            .append(create_test_event("api-gateway", 200, 100.0, now))
            .unwrap();

        let stats = snapshot(&store, None, Some("checkout"));
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.error_rate, 100.0);
        assert_eq!(stats.active_services, 1);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        for i in 0..10 {
            let status = if i % 2 == 0 { 200 } else { 503 };
            store
                .append(create_test_event("api-gateway", status, 150.0, now))
                .unwrap();
        }

        let first = snapshot(&store, Some(300), None);
        let second = snapshot(&store, Some(300), None);
        assert_eq!(first, second);
    }
}
