//! Time-bucketed series reduction
//!
//! Groups events into fixed-width time buckets keyed by aligned epoch
//! boundaries and reduces each bucket to a scalar per metric. Buckets with no
//! events are omitted rather than zero-filled, so callers must handle sparse
//! series.

use crate::events::{TimeSeriesPoint, Timestamp};
use crate::store::{EventFilter, EventStore};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric to reduce within each bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Mean request latency in milliseconds
    Latency,
    /// Error rate within the bucket as a fraction (0-1), not scaled to percent
    Errors,
    /// Number of requests in the bucket
    Requests,
}

/// Reduce recent events into a time series of fixed-width buckets
///
/// Selects events within `lookback_seconds` of now, assigns each to the bucket
/// starting at `floor(epoch_seconds / interval) * interval`, and reduces each
/// bucket per the metric. Bucket boundaries are aligned to the epoch, so they
/// are stable across queries observing the same wall clock.
///
/// # Arguments
///
/// * `store` - The event store to read from
/// * `metric` - Which per-bucket reduction to compute
/// * `interval_seconds` - Bucket width in seconds
/// * `lookback_seconds` - How far back from now to select events
///
/// # Returns
///
/// Points sorted by bucket start ascending; empty buckets are absent. A
/// non-positive interval selects no buckets and yields an empty series;
/// boundaries reject such intervals before calling here.
pub fn series(
    store: &EventStore,
    metric: Metric,
    interval_seconds: i64,
    lookback_seconds: i64,
) -> Vec<TimeSeriesPoint> {
    if interval_seconds <= 0 {
        return Vec::new();
    }

    let cutoff = Utc::now() - Duration::seconds(lookback_seconds);
    let recent = store.query(&EventFilter::new().since(cutoff));

    let mut buckets: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for event in recent {
        let bucket = bucket_start(event.timestamp, interval_seconds);
        let value = match metric {
            Metric::Latency => event.latency_ms,
            Metric::Errors => {
                if event.is_error() {
                    1.0
                } else {
                    0.0
                }
            }
            Metric::Requests => 1.0,
        };
        buckets.entry(bucket).or_default().push(value);
    }

    buckets
        .into_iter()
        .filter_map(|(bucket, values)| {
            let value = match metric {
                Metric::Requests => values.len() as f64,
                Metric::Latency | Metric::Errors => {
                    values.iter().sum::<f64>() / values.len() as f64
                }
            };
            DateTime::from_timestamp(bucket, 0).map(|timestamp| TimeSeriesPoint { timestamp, value })
        })
        .collect()
}

/// Epoch-aligned bucket start for a timestamp, in whole seconds
fn bucket_start(timestamp: Timestamp, interval_seconds: i64) -> i64 {
    timestamp.timestamp().div_euclid(interval_seconds) * interval_seconds
}
