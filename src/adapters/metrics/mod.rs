//! Metrics Adapters
//!
//! Prometheus metrics for wallet, balance and transfer operations,
//! rendered on `/metrics` by the HTTP adapter.

pub mod prometheus;

pub use self::prometheus::MetricsRegistry;
