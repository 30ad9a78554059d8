//! HTTP API Adapter
//!
//! Exposes the custody use cases as a JSON API via axum 0.7.
//!
//! Sub-modules:
//! - `server`: Router, handlers, health checks and server lifecycle
//! - `types`: Request/response type definitions

pub mod server;
pub mod types;

pub use server::{ApiServer, ApiState, HealthState, router};
