//! Engine facade exposing the ingestion, query, and alert boundaries
//!
//! TelemetryService is the single-instance owner of the event store and alert
//! engine. Every operation is synchronous, in-memory, and bounded by the store
//! size; embedding processes provide the mutual-exclusion boundary (e.g. an
//! `Arc<Mutex<TelemetryService>>`) and any refresh scheduling.

use crate::aggregator;
use crate::alerts::{AlertEngine, AlertRule};
use crate::error::{AlertError, ValidationError};
use crate::events::{DashboardStats, RequestEvent, ServiceHealth, TimeSeriesPoint, Timestamp};
use crate::health;
use crate::store::{EventFilter, EventStore};
use crate::timeseries::{self, Metric};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Window for the aggregate stats boundary
pub const STATS_WINDOW_SECONDS: i64 = 300;
/// Lookback for the time series boundary
pub const TIMESERIES_LOOKBACK_SECONDS: i64 = 1800;
/// Default bound on event query results
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Structured ingestion payload describing one request event
///
/// `id` and `timestamp` are assigned at ingestion when absent; an explicit
/// timestamp allows seeding historical data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub service_name: String,
    pub endpoint: String,
    pub method: String,
    pub status_code: u16,
    pub latency_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

/// Query parameters for the raw event boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQuery {
    /// Restrict to one service
    #[serde(default)]
    pub service: Option<String>,
    /// Maximum number of events returned, newest first (default 100)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Inclusive lower bound on event timestamps
    #[serde(default)]
    pub since: Option<Timestamp>,
}

/// Single-instance telemetry engine owning all mutable state
pub struct TelemetryService {
    store: EventStore,
    alerts: AlertEngine,
    /// Configured service catalog, checked ahead of observed services
    services: Vec<String>,
}

impl TelemetryService {
    /// Create a service with the given store capacity and service catalog
    pub fn new(capacity: usize, services: Vec<String>) -> Self {
        Self {
            store: EventStore::new(capacity),
            alerts: AlertEngine::with_seed_rules(),
            services,
        }
    }

    /// Validate and store one request event
    ///
    /// Assigns `id` and `timestamp` when the payload omits them and returns
    /// the stored event.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty required field, a status code
    /// outside 100-599, a non-finite or negative latency, or an error message
    /// that does not correspond to the status code.
    pub fn ingest(&mut self, request: IngestRequest) -> Result<RequestEvent, ValidationError> {
        validate(&request)?;

        let event = RequestEvent {
            id: request.id.unwrap_or_else(Uuid::new_v4),
            timestamp: request.timestamp.unwrap_or_else(Utc::now),
            service_name: request.service_name,
            endpoint: request.endpoint,
            method: request.method,
            status_code: request.status_code,
            latency_ms: request.latency_ms,
            error_message: request.error_message,
        };

        self.store.append(event.clone())?;
        Ok(event)
    }

    /// Query stored events, newest first, bounded by the query limit
    pub fn events(&self, query: &EventQuery) -> Vec<RequestEvent> {
        let mut filter = EventFilter::new();
        if let Some(ref service) = query.service {
            filter = filter.service(service.clone());
        }
        if let Some(since) = query.since {
            filter = filter.since(since);
        }

        let mut selected: Vec<RequestEvent> =
            self.store.query(&filter).into_iter().cloned().collect();
        selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        selected.truncate(query.limit.unwrap_or(DEFAULT_QUERY_LIMIT));
        selected
    }

    /// Aggregate snapshot over the fixed 5-minute window
    pub fn dashboard_stats(&self) -> DashboardStats {
        aggregator::snapshot(&self.store, Some(STATS_WINDOW_SECONDS), None)
    }

    /// Time series over the fixed 30-minute lookback
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInterval` for a non-positive bucket
    /// width.
    pub fn timeseries(
        &self,
        metric: Metric,
        interval_seconds: i64,
    ) -> Result<Vec<TimeSeriesPoint>, ValidationError> {
        if interval_seconds <= 0 {
            return Err(ValidationError::InvalidInterval(interval_seconds));
        }
        Ok(timeseries::series(
            &self.store,
            metric,
            interval_seconds,
            TIMESERIES_LOOKBACK_SECONDS,
        ))
    }

    /// Health records for every known service
    ///
    /// Configured services come first in catalog order, followed by any
    /// services observed in the store that the catalog does not list.
    pub fn service_health(&self) -> Vec<ServiceHealth> {
        let mut names = self.services.clone();
        for observed in self.store.service_names() {
            if !names.iter().any(|n| *n == observed) {
                names.push(observed);
            }
        }
        health::evaluate_all(&self.store, &names)
    }

    /// All alert rules ordered by id
    pub fn alerts(&self) -> Vec<AlertRule> {
        self.alerts.list()
    }

    /// Toggle an alert rule's enabled flag
    ///
    /// # Errors
    ///
    /// Returns `AlertError::RuleNotFound` for an unknown id.
    pub fn toggle_alert(&mut self, id: &str, enabled: bool) -> Result<AlertRule, AlertError> {
        self.alerts.toggle(id, enabled)
    }

    /// Run one alert evaluation pass against the current aggregates
    ///
    /// This is the aggregation tick the embedding scheduler invokes; the
    /// engine performs no polling of its own.
    pub fn evaluate_alerts(&mut self) {
        let stats = self.dashboard_stats();
        let health = self.service_health();
        self.alerts.evaluate_all(&stats, &health);
    }

    /// Number of events currently retained
    pub fn event_count(&self) -> usize {
        self.store.len()
    }

    /// Read-only access to the underlying store
    pub fn store(&self) -> &EventStore {
        &self.store
    }
}

/// Validate an ingestion payload before constructing the event
fn validate(request: &IngestRequest) -> Result<(), ValidationError> {
    if request.service_name.trim().is_empty() {
        return Err(ValidationError::MissingField("service_name"));
    }
    if request.endpoint.trim().is_empty() {
        return Err(ValidationError::MissingField("endpoint"));
    }
    if request.method.trim().is_empty() {
        return Err(ValidationError::MissingField("method"));
    }
    if !(100..=599).contains(&request.status_code) {
        return Err(ValidationError::InvalidStatusCode(request.status_code));
    }
    if !request.latency_ms.is_finite() || request.latency_ms < 0.0 {
        return Err(ValidationError::InvalidLatency(request.latency_ms));
    }
    if (request.status_code >= 400) != request.error_message.is_some() {
        return Err(ValidationError::ErrorMessageMismatch(request.status_code));
    }
    Ok(())
}
