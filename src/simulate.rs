//! Synthetic request traffic generation
//!
//! Produces randomized ingestion payloads from fixed pools of services,
//! endpoints, methods, and status codes, and can seed a service with
//! historical data spread over the recent past.

use crate::error::ValidationError;
use crate::service::{IngestRequest, TelemetryService};
use chrono::{Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Service pool used for generated traffic
pub const SERVICES: [&str; 4] = [
    "api-gateway",
    "auth-service",
    "payment-service",
    "user-service",
];

const ENDPOINTS: [&str; 4] = ["/api/users", "/api/orders", "/api/products", "/api/auth"];
const METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];
const STATUS_CODES: [u16; 6] = [200, 201, 400, 404, 500, 503];

/// Generate one randomized ingestion payload
///
/// Latency is uniform in [50, 1050) milliseconds; failed requests carry an
/// `"Error {status}"` message so the payload always satisfies the event
/// invariant.
pub fn generate_request<R: Rng + ?Sized>(rng: &mut R) -> IngestRequest {
    // The pools are non-empty, so choose never returns None
    let service = SERVICES.choose(rng).copied().unwrap_or(SERVICES[0]);
    let endpoint = ENDPOINTS.choose(rng).copied().unwrap_or(ENDPOINTS[0]);
    let method = METHODS.choose(rng).copied().unwrap_or(METHODS[0]);
    let status_code = STATUS_CODES.choose(rng).copied().unwrap_or(STATUS_CODES[0]);
    let latency_ms = rng.random_range(50..1050) as f64;

    IngestRequest {
        service_name: service.to_string(),
        endpoint: endpoint.to_string(),
        method: method.to_string(),
        status_code,
        latency_ms,
        error_message: if status_code >= 400 {
            Some(format!("Error {}", status_code))
        } else {
            None
        },
        timestamp: None,
        id: None,
    }
}

/// Seed a service with `count` historical events, one per minute
///
/// Events are timestamped from `count` minutes ago up to one minute ago, so a
/// freshly started process has data across the whole time-series lookback.
///
/// # Errors
///
/// Propagates `ValidationError` from ingestion; generated payloads are always
/// valid, so this only fails if the store rejects them.
pub fn seed_history(
    service: &mut TelemetryService,
    count: usize,
) -> Result<usize, ValidationError> {
    let mut rng = rand::rng();
    let now = Utc::now();

    for i in 0..count {
        let mut request = generate_request(&mut rng);
        request.timestamp = Some(now - Duration::minutes((count - i) as i64));
        service.ingest(request)?;
    }
    Ok(count)
}
