//! Contract Validator - On-chain Verification at Startup
//!
//! Validates that the configured token address points to an actual
//! deployed contract, and that the configured JSON ABI (if any) declares
//! every function the service calls:
//! 1. Code exists at the address (not an EOA)
//! 2. `balanceOf(address)`, `transfer(address,uint256)` and
//!    `approve(address,uint256)` are present in the ABI

use std::sync::Arc;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use anyhow::{Context, Result};
use tracing::{info, instrument};

use super::provider::RpcProvider;

/// Function signatures the service depends on.
pub const REQUIRED_FUNCTIONS: [&str; 3] = [
    "balanceOf(address)",
    "transfer(address,uint256)",
    "approve(address,uint256)",
];

/// Validates the token contract against on-chain state.
pub struct ContractValidator {
    /// Shared provider for on-chain queries.
    provider: Arc<RpcProvider>,
}

impl ContractValidator {
    /// Create a new validator with the given provider.
    pub fn new(provider: Arc<RpcProvider>) -> Self {
        Self { provider }
    }

    /// Fail unless code is deployed at `token`.
    #[instrument(skip(self))]
    pub async fn validate_token(&self, token: Address) -> Result<()> {
        let code = self
            .provider
            .inner()
            .get_code_at(token)
            .await
            .context("Failed to query token contract code")?;

        anyhow::ensure!(
            !code.is_empty(),
            "Token contract at {token} has no deployed code; check config.toml"
        );

        info!(address = %token, "Token contract validated: code exists on-chain");
        Ok(())
    }

    /// Load the ABI at `path` and check it declares every required function.
    #[instrument(skip(self))]
    pub fn validate_abi_file(&self, path: &str) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read token ABI: {path}"))?;

        check_abi(&content).with_context(|| format!("Token ABI {path} is not usable"))?;

        info!(path, "Token ABI validated");
        Ok(())
    }
}

/// Parse a JSON ABI (bare array or `{ "abi": [...] }` artifact) and check
/// it declares every function in `REQUIRED_FUNCTIONS`.
pub fn check_abi(content: &str) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(content).context("ABI is not valid JSON")?;
    let abi_value = match value {
        serde_json::Value::Object(mut artifact) => artifact
            .remove("abi")
            .context("ABI artifact has no \"abi\" field")?,
        other => other,
    };
    let abi: JsonAbi = serde_json::from_value(abi_value).context("Malformed JSON ABI")?;

    let declared: Vec<String> = abi.functions().map(|f| f.signature()).collect();
    let missing: Vec<&str> = REQUIRED_FUNCTIONS
        .iter()
        .copied()
        .filter(|required| !declared.iter().any(|d| d == required))
        .collect();

    anyhow::ensure!(missing.is_empty(), "ABI is missing: {}", missing.join(", "));
    Ok(())
}
