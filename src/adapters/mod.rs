//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (blockchain RPC, HTTP server, metrics).
//! Each sub-module groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `chain`: EVM / ERC-20 interaction via alloy-rs
//! - `http`: Custody JSON API and health checks via axum
//! - `metrics`: Prometheus metrics registry

pub mod chain;
pub mod http;
pub mod metrics;
