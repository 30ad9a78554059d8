//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`, with the chain
//! endpoint and token contract overridable from environment variables.
//! Everything is resolved once at startup and read-only afterwards.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Service identity and HTTP listener.
  pub service: ServiceConfig,
  /// Chain endpoint and token contract.
  pub chain: ChainConfig,
  /// Metrics export.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
  /// Human-readable service name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// HTTP API bind address.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
}

/// Chain endpoint and token contract configuration.
///
/// Contract addresses are ALWAYS in config - never hardcoded.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
  /// JSON-RPC endpoint (env: `CHAIN_RPC_URL`).
  #[serde(default)]
  pub rpc_url: String,
  /// Expected chain ID; checked at startup when set.
  pub chain_id: Option<u64>,
  /// Token contract address (env: `TOKEN_CONTRACT_ADDRESS`).
  #[serde(default)]
  pub token_address: String,
  /// Path to the token's JSON ABI (env: `TOKEN_CONTRACT_ABI`).
  pub abi_path: Option<String>,
  /// Wait for the mined receipt before reporting a broadcast as sent.
  #[serde(default = "default_true")]
  pub confirm_receipt: bool,
  /// Upper bound on the receipt wait (seconds).
  #[serde(default = "default_receipt_timeout")]
  pub receipt_timeout_seconds: u64,
}

/// Metrics and monitoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Serve Prometheus metrics on `/metrics`.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "token-custody".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_true() -> bool {
  true
}

fn default_receipt_timeout() -> u64 {
  120
}
