//! Configuration Loader - File Loading, Env Overrides and Validation
//!
//! Handles loading `config.toml`, applying environment overrides for the
//! chain endpoint and token contract, and validating the result with
//! clear error messages for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Environment variable overriding `chain.rpc_url`.
pub const ENV_RPC_URL: &str = "CHAIN_RPC_URL";
/// Environment variable overriding `chain.token_address`.
pub const ENV_TOKEN_ADDRESS: &str = "TOKEN_CONTRACT_ADDRESS";
/// Environment variable overriding `chain.abi_path`.
pub const ENV_TOKEN_ABI: &str = "TOKEN_CONTRACT_ABI";

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content, |key| std::env::var(key).ok())?;

  info!(
    chain_id = ?config.chain.chain_id,
    token = %config.chain.token_address,
    confirm_receipt = config.chain.confirm_receipt,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse TOML, apply overrides from `env`, and validate.
pub fn parse_config<F>(content: &str, env: F) -> Result<AppConfig>
where
  F: Fn(&str) -> Option<String>,
{
  let mut config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;

  apply_env_overrides(&mut config, env);
  validate_config(&config)?;

  Ok(config)
}

/// Environment values win over file values when set and non-empty.
fn apply_env_overrides<F>(config: &mut AppConfig, env: F)
where
  F: Fn(&str) -> Option<String>,
{
  let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

  if let Some(url) = lookup(ENV_RPC_URL) {
    config.chain.rpc_url = url;
  }
  if let Some(address) = lookup(ENV_TOKEN_ADDRESS) {
    config.chain.token_address = address;
  }
  if let Some(abi) = lookup(ENV_TOKEN_ABI) {
    config.chain.abi_path = Some(abi);
  }
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.chain.rpc_url.trim().is_empty(),
    "chain.rpc_url must be set (or {ENV_RPC_URL})"
  );

  anyhow::ensure!(
    config.chain.rpc_url.starts_with("http://") || config.chain.rpc_url.starts_with("https://"),
    "chain.rpc_url must be an http(s) URL, got {}",
    config.chain.rpc_url
  );

  anyhow::ensure!(
    !config.chain.token_address.trim().is_empty(),
    "chain.token_address must be set (or {ENV_TOKEN_ADDRESS})"
  );

  config
    .chain
    .token_address
    .parse::<Address>()
    .with_context(|| format!("Invalid chain.token_address: {}", config.chain.token_address))?;

  anyhow::ensure!(
    config.chain.receipt_timeout_seconds > 0,
    "chain.receipt_timeout_seconds must be positive"
  );

  config
    .service
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| format!("Invalid service.bind_address: {}", config.service.bind_address))?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

  fn minimal() -> String {
    format!(
      r#"
[service]
name = "custody-test"

[chain]
rpc_url = "http://localhost:8545"
chain_id = 31337
token_address = "{TOKEN}"
"#
    )
  }

  fn no_env(_: &str) -> Option<String> {
    None
  }

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_defaults_applied() {
    let config = parse_config(&minimal(), no_env).unwrap();
    assert_eq!(config.service.name, "custody-test");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.service.bind_address, "0.0.0.0:8080");
    assert_eq!(config.chain.chain_id, Some(31337));
    assert!(config.chain.confirm_receipt);
    assert_eq!(config.chain.receipt_timeout_seconds, 120);
    assert!(config.chain.abi_path.is_none());
    assert!(config.metrics.enabled);
  }

  #[test]
  fn test_env_overrides_file() {
    let other = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
    let config = parse_config(&minimal(), |key| match key {
      ENV_RPC_URL => Some("https://bsc-dataseed.binance.org".to_string()),
      ENV_TOKEN_ADDRESS => Some(other.to_string()),
      ENV_TOKEN_ABI => Some("abi/token.json".to_string()),
      _ => None,
    })
    .unwrap();

    assert_eq!(config.chain.rpc_url, "https://bsc-dataseed.binance.org");
    assert_eq!(config.chain.token_address, other);
    assert_eq!(config.chain.abi_path.as_deref(), Some("abi/token.json"));
  }

  #[test]
  fn test_blank_env_ignored() {
    let config = parse_config(&minimal(), |key| {
      (key == ENV_RPC_URL).then(|| "  ".to_string())
    })
    .unwrap();
    assert_eq!(config.chain.rpc_url, "http://localhost:8545");
  }

  #[test]
  fn test_env_only_chain_settings() {
    let content = "[service]\n[chain]\n";
    let config = parse_config(content, |key| match key {
      ENV_RPC_URL => Some("http://localhost:8545".to_string()),
      ENV_TOKEN_ADDRESS => Some(TOKEN.to_string()),
      _ => None,
    })
    .unwrap();
    assert_eq!(config.chain.token_address, TOKEN);
  }

  #[test]
  fn test_missing_rpc_url_rejected() {
    let err = parse_config("[service]\n[chain]\n", no_env).unwrap_err();
    assert!(err.to_string().contains("rpc_url"));
  }

  #[test]
  fn test_invalid_token_address_rejected() {
    let content = minimal().replace(TOKEN, "0xnot-an-address");
    let err = parse_config(&content, no_env).unwrap_err();
    assert!(err.to_string().contains("token_address"));
  }

  #[test]
  fn test_invalid_bind_address_rejected() {
    let content = minimal().replace("name = \"custody-test\"", "bind_address = \"nowhere\"");
    assert!(parse_config(&content, no_env).is_err());
  }
}
