/// Error types for the aggregation engine
pub mod error;

/// Core telemetry data types
pub mod events;

/// Bounded rolling event store
pub mod store;

/// Rolling statistics over the event store
pub mod aggregator;

/// Time-bucketed series reduction
pub mod timeseries;

/// Per-service health classification
pub mod health;

/// Alert engine and rule definitions
pub mod alerts;

/// Engine facade exposing the external boundaries
pub mod service;

/// Synthetic request traffic generation
pub mod simulate;

/// Configuration management
pub mod config;

// Re-export commonly used types
pub use error::{AlertError, ConfigError, ValidationError};
