//! Bounded rolling event store
//!
//! This module provides the EventStore, an append-only FIFO buffer of request
//! events with a fixed capacity. The store is a bounded rolling window, not an
//! archive: when capacity is exceeded the oldest events are silently evicted.

use crate::error::ValidationError;
use crate::events::{RequestEvent, Timestamp};
use log::debug;
use std::collections::VecDeque;

/// Predicate for selecting events from the store
///
/// Combines an optional service-name equality match with an optional inclusive
/// `since` timestamp lower bound. An empty filter matches every event.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    service_name: Option<String>,
    since: Option<Timestamp>,
}

impl EventFilter {
    /// Create a filter that matches every event
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the filter to events from the given service
    pub fn service(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Restrict the filter to events at or after the given timestamp
    pub fn since(mut self, since: Timestamp) -> Self {
        self.since = Some(since);
        self
    }

    /// Whether the given event satisfies this filter
    pub fn matches(&self, event: &RequestEvent) -> bool {
        if let Some(ref service) = self.service_name {
            if event.service_name != *service {
                return false;
            }
        }
        if let Some(since) = self.since {
            if event.timestamp < since {
                return false;
            }
        }
        true
    }
}

/// Append-only event buffer with FIFO eviction
///
/// Events are kept in arrival order and never mutated after insertion. The
/// buffer never holds more than `capacity` events; overflow evicts from the
/// head without surfacing anything to the caller.
pub struct EventStore {
    events: VecDeque<RequestEvent>,
    capacity: usize,
}

impl EventStore {
    /// Create a new store holding at most `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event at the tail, evicting from the head on overflow
    ///
    /// The only validation performed here is the event invariant: an
    /// `error_message` must be present exactly when `status_code >= 400`.
    /// Callers are expected to have validated the rest of the payload at the
    /// ingestion boundary.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ErrorMessageMismatch` if the status code and
    /// error message do not correspond.
    pub fn append(&mut self, event: RequestEvent) -> Result<(), ValidationError> {
        if event.is_error() != event.error_message.is_some() {
            return Err(ValidationError::ErrorMessageMismatch(event.status_code));
        }

        self.events.push_back(event);
        while self.events.len() > self.capacity {
            if let Some(evicted) = self.events.pop_front() {
                debug!("Store at capacity, evicted oldest event {}", evicted.id);
            }
        }
        Ok(())
    }

    /// Select events matching the filter, in insertion order
    ///
    /// Returns borrowed events; the store itself is untouched. No limit is
    /// applied here, callers impose their own ordering and bounds.
    pub fn query(&self, filter: &EventFilter) -> Vec<&RequestEvent> {
        self.events
            .iter()
            .filter(|event| filter.matches(event))
            .collect()
    }

    /// Iterate over all stored events in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &RequestEvent> {
        self.events.iter()
    }

    /// Distinct service names across the whole store, in first-seen order
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for event in &self.events {
            if !names.iter().any(|n| *n == event.service_name) {
                names.push(event.service_name.clone());
            }
        }
        names
    }

    /// Number of events currently stored
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Maximum number of events the store retains
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn create_test_event(service: &str, status_code: u16, timestamp: Timestamp) -> RequestEvent {
        RequestEvent {
            id: Uuid::new_v4(),
            timestamp,
            service_name: service.to_string(),
            endpoint: "/api/users".to_string(),
            method: "GET".to_string(),
            status_code,
            latency_ms: 120.0,
            error_message: if status_code >= 400 {
                Some(format!("Error {}", status_code))
            } else {
                None
            },
        }
    }

    #[test]
    fn test_append_and_query() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        store.append(create_test_event("api-gateway", 200, now)).unwrap();
        store.append(create_test_event("auth-service", 500, now)).unwrap();

        let all = store.query(&EventFilter::new());
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].service_name, "api-gateway");
        assert_eq!(all[1].service_name, "auth-service");
    }

    #[test]
    fn test_query_by_service() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        store.append(create_test_event("api-gateway", 200, now)).unwrap();
        store.append(create_test_event("auth-service", 200, now)).unwrap();
        store.append(create_test_event("api-gateway", 404, now)).unwrap();

        let gateway = store.query(&EventFilter::new().service("api-gateway"));
        assert_eq!(gateway.len(), 2);
        assert!(gateway.iter().all(|e| e.service_name == "api-gateway"));
    }

    #[test]
    fn test_query_since_is_inclusive() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        store
            .append(create_test_event("api-gateway", 200, now - Duration::seconds(60)))
            .unwrap();
        store.append(create_test_event("api-gateway", 200, now)).unwrap();

        let recent = store.query(&EventFilter::new().since(now));
        assert_eq!(recent.len(), 1);

        let boundary = store.query(&EventFilter::new().since(now - Duration::seconds(60)));
        assert_eq!(boundary.len(), 2);
    }

    #[test]
    fn test_combined_filter() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        store
            .append(create_test_event("auth-service", 200, now - Duration::seconds(120)))
            .unwrap();
        store.append(create_test_event("auth-service", 200, now)).unwrap();
        store.append(create_test_event("api-gateway", 200, now)).unwrap();

        let filter = EventFilter::new()
            .service("auth-service")
            .since(now - Duration::seconds(30));
        let selected = store.query(&filter);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].service_name, "auth-service");
    }

    #[test]
    fn test_capacity_eviction_is_silent_fifo() {
        let mut store = EventStore::new(5);
        let now = Utc::now();

        for i in 0..10 {
            store
                .append(create_test_event(
                    "api-gateway",
                    200,
                    now + Duration::milliseconds(i),
                ))
                .unwrap();
        }

        // Exactly the last 5 events remain, in arrival order
        assert_eq!(store.len(), 5);
        let remaining = store.query(&EventFilter::new());
        for (i, event) in remaining.iter().enumerate() {
            assert_eq!(event.timestamp, now + Duration::milliseconds(5 + i as i64));
        }
    }

    #[test]
    fn test_append_rejects_invariant_violation() {
        let mut store = EventStore::new(10);
        let now = Utc::now();

        // Error status without a message
        let mut event = create_test_event("api-gateway", 500, now);
        event.error_message = None;
        assert_eq!(
            store.append(event),
            Err(ValidationError::ErrorMessageMismatch(500))
        );

        // Success status with a message
        let mut event = create_test_event("api-gateway", 200, now);
        event.error_message = Some("spurious".to_string());
        assert_eq!(
            store.append(event),
            Err(ValidationError::ErrorMessageMismatch(200))
        );

        assert!(store.is_empty());
    }

    #[test]
    fn test_service_names_first_seen_order() {
        let mut store = EventStore::new(100);
        let now = Utc::now();

        store.append(create_test_event("payment-service", 200, now)).unwrap();
        store.append(create_test_event("api-gateway", 200, now)).unwrap();
        store.append(create_test_event("payment-service", 200, now)).unwrap();

        assert_eq!(store.service_names(), vec!["payment-service", "api-gateway"]);
    }
}
