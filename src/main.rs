//! Token Custody - Entry Point
//!
//! Initializes configuration, logging and the chain connection, then
//! serves the custody HTTP API until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + env overrides + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Connect RPC provider (chain ID check)
//! 4. Validate token contract code + ABI
//! 5. Create Erc20Chain (implements ChainService port)
//! 6. Create metrics registry
//! 7. Spawn API server (wallets, balances, transfers, health checks, metrics)
//! 8. Wait for SIGINT → readiness off → drain → exit

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use token_custody::adapters::chain::{ContractValidator, Erc20Chain, RpcProvider};
use token_custody::adapters::http::{ApiServer, ApiState, HealthState};
use token_custody::adapters::metrics::MetricsRegistry;
use token_custody::config;
use token_custody::ports::ChainService;

/// Config file path, overridable with `TOKEN_CUSTODY_CONFIG`.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let config_path = std::env::var("TOKEN_CUSTODY_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.service.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        token = %config.chain.token_address,
        "Starting token custody service"
    );

    // ── 3. Connect to the chain ─────────────────────────────
    let provider = Arc::new(
        RpcProvider::connect(&config.chain)
            .await
            .context("Failed to connect to chain RPC")?,
    );

    // ── 4. Create ERC-20 adapter (ChainService port) ────────
    let chain = Arc::new(
        Erc20Chain::from_config(Arc::clone(&provider), &config.chain)
            .context("Failed to create token adapter")?,
    );

    // ── 5. Validate token contract on-chain ─────────────────
    let validator = ContractValidator::new(Arc::clone(&provider));
    validator
        .validate_token(chain.token_address())
        .await
        .context("Token contract validation failed")?;
    if let Some(abi_path) = &config.chain.abi_path {
        validator.validate_abi_file(abi_path)?;
    }

    // ── 6. Metrics registry ─────────────────────────────────
    let metrics = if config.metrics.enabled {
        Some(Arc::new(
            MetricsRegistry::new().context("Failed to register metrics")?,
        ))
    } else {
        None
    };

    // ── 7. Spawn API server ─────────────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health = Arc::new(HealthState::new());
    let state = Arc::new(ApiState::new(chain, metrics, Arc::clone(&health)));

    let server = ApiServer::new(state, config.service.bind_address.clone());
    let server_shutdown = shutdown_tx.subscribe();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run(server_shutdown).await {
            error!(error = %e, "API server failed");
        }
    });

    info!(address = %config.service.bind_address, "Service is running");

    // ── 8. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    // Readiness check → 503 before the listener closes
    health.begin_shutdown();
    let _ = shutdown_tx.send(());

    // In-flight transfers get up to 30s to finish
    if tokio::time::timeout(std::time::Duration::from_secs(30), server_handle)
        .await
        .is_err()
    {
        error!("API server did not stop within 30s");
    }

    info!("Shutdown complete");
    Ok(())
}
