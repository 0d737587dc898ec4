//! Core telemetry types for the observability aggregation engine
//!
//! This module defines the fundamental data structures used throughout the
//! application for representing request events, aggregate statistics, service
//! health, and time series data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp type for consistent time handling across the application
pub type Timestamp = DateTime<Utc>;

/// A single recorded request observation
///
/// Represents one request-level event ingested into the engine. Events are
/// immutable once stored. The `error_message` field is present if and only if
/// `status_code >= 400`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestEvent {
    /// Unique identifier assigned at generation time
    pub id: Uuid,
    /// When the request was observed
    pub timestamp: Timestamp,
    /// Logical service that handled the request
    pub service_name: String,
    /// Request path
    pub endpoint: String,
    /// HTTP method
    pub method: String,
    /// Response status code (100-599)
    pub status_code: u16,
    /// Request latency in milliseconds, non-negative
    pub latency_ms: f64,
    /// Error description, present iff the request failed (status >= 400)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RequestEvent {
    /// Whether this event represents a failed request
    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

/// Point-in-time rollup of events over a window and filter
///
/// Recomputed per query, never stored. All fields are defined as zero when the
/// selection is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Number of events in the selection
    pub total_requests: usize,
    /// Mean latency over the selection, rounded to the nearest millisecond
    pub avg_latency_ms: u64,
    /// Percentage of failed requests, rounded to 2 decimal places
    pub error_rate: f64,
    /// Number of distinct services in the selection
    pub active_services: usize,
}

impl DashboardStats {
    /// Stats for an empty selection: every field zero, never NaN
    pub fn empty() -> Self {
        Self {
            total_requests: 0,
            avg_latency_ms: 0,
            error_rate: 0.0,
            active_services: 0,
        }
    }
}

/// Discrete operational status for one logical service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Uptime at or above 99% and latency within bounds
    Healthy,
    /// Elevated error rate or latency
    Degraded,
    /// Uptime below 95%
    Down,
}

/// Derived health record for one logical service
///
/// Always recomputed from the current store contents; `last_check` is the
/// query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub service_name: String,
    pub status: HealthStatus,
    /// `100 - error_rate`
    pub uptime_percentage: f64,
    pub avg_latency_ms: u64,
    pub error_rate: f64,
    pub last_check: Timestamp,
}

/// One point of a reduced time series: bucket start and reduced value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Start of the bucket, aligned to an epoch boundary
    pub timestamp: Timestamp,
    /// Reduced metric value for the bucket
    pub value: f64,
}

/// Severity level for alert rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action required
    Info,
    /// May require attention
    Warning,
    /// Requires immediate attention
    Critical,
}
