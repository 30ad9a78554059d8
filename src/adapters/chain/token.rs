//! ERC-20 Token Adapter - ChainService over alloy-rs
//!
//! Implements the `ChainService` port against a single ERC-20 contract:
//! `balanceOf` / `approve` as `eth_call`s, `transfer` gas estimates,
//! local signing with `PrivateKeySigner` and raw broadcast. The token
//! address comes from `config.toml` and is validated at startup.

use std::sync::Arc;
use std::time::Duration;

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Encodable2718;
use alloy::network::{Ethereum, EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::sol_types::SolCall;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::config::ChainConfig;
use crate::domain::account::PrivateKey;
use crate::ports::chain_service::{
    CallContext, ChainService, SignedTransaction, TokenCall, TransactionEnvelope,
};

use super::provider::RpcProvider;

sol! {
    /// The subset of ERC-20 the custody service calls.
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// How `broadcast` treats a transaction once the node accepted it.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastOptions {
    /// Wait for the mined receipt and fail on revert.
    pub confirm_receipt: bool,
    /// Upper bound on the receipt wait.
    pub receipt_timeout: Duration,
}

impl From<&ChainConfig> for BroadcastOptions {
    fn from(config: &ChainConfig) -> Self {
        Self {
            confirm_receipt: config.confirm_receipt,
            receipt_timeout: Duration::from_secs(config.receipt_timeout_seconds),
        }
    }
}

/// `ChainService` implementation for one ERC-20 token contract.
pub struct Erc20Chain {
    /// Shared RPC provider.
    provider: Arc<RpcProvider>,
    /// Token contract address.
    token: Address,
    /// Receipt handling after broadcast.
    options: BroadcastOptions,
}

impl Erc20Chain {
    /// Create an adapter for `token`.
    pub fn new(provider: Arc<RpcProvider>, token: Address, options: BroadcastOptions) -> Self {
        Self {
            provider,
            token,
            options,
        }
    }

    /// Create an adapter from the `[chain]` config section.
    pub fn from_config(provider: Arc<RpcProvider>, config: &ChainConfig) -> Result<Self> {
        let token: Address = config
            .token_address
            .parse()
            .context("Invalid token contract address")?;

        Ok(Self::new(provider, token, BroadcastOptions::from(config)))
    }

    /// Build a request targeting the token contract.
    fn call_request(&self, from: Option<Address>, call: &TokenCall) -> TransactionRequest {
        let request = TransactionRequest::default()
            .with_to(self.token)
            .with_input(self.encode_call(call));

        match from {
            Some(sender) => request.with_from(sender),
            None => request,
        }
    }
}

/// The transaction may still be mined; the hash lets the caller check
/// before resubmitting.
fn unconfirmed<E>(tx_hash: TxHash, source: E) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    anyhow::Error::new(source).context(format!(
        "Transaction {tx_hash} was broadcast but its receipt was not confirmed"
    ))
}

fn signer_for(key: &PrivateKey) -> Result<PrivateKeySigner> {
    PrivateKeySigner::from_bytes(key.as_bytes()).context("Invalid private key")
}

#[async_trait]
impl ChainService for Erc20Chain {
    fn token_address(&self) -> Address {
        self.token
    }

    fn derive_account(&self, key: &PrivateKey) -> Result<Address> {
        Ok(signer_for(key)?.address())
    }

    fn encode_call(&self, call: &TokenCall) -> Bytes {
        let encoded = match *call {
            TokenCall::BalanceOf { owner } => IERC20::balanceOfCall { owner }.abi_encode(),
            TokenCall::Transfer { to, amount } => IERC20::transferCall { to, amount }.abi_encode(),
            TokenCall::Approve { spender, amount } => {
                IERC20::approveCall { spender, amount }.abi_encode()
            }
        };
        Bytes::from(encoded)
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn token_balance(&self, owner: Address) -> Result<U256> {
        let request = self.call_request(None, &TokenCall::BalanceOf { owner });

        let output = self
            .provider
            .inner()
            .call(&request)
            .await
            .context("balanceOf call failed")?;

        let decoded = IERC20::balanceOfCall::abi_decode_returns(&output, true)
            .context("Malformed balanceOf return data")?;

        Ok(decoded._0)
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn native_balance(&self, owner: Address) -> Result<U256> {
        self.provider
            .inner()
            .get_balance(owner)
            .await
            .context("eth_getBalance failed")
    }

    #[instrument(skip(self), fields(sender = %ctx.sender))]
    async fn estimate_gas(&self, ctx: &CallContext, call: &TokenCall) -> Result<u64> {
        let request = self.call_request(Some(ctx.sender), call);

        let gas = self
            .provider
            .inner()
            .estimate_gas(&request)
            .await
            .context("eth_estimateGas failed")?;

        debug!(gas, "Gas estimated");
        Ok(gas)
    }

    #[instrument(skip(self), fields(sender = %ctx.sender, spender = %spender))]
    async fn approve_call(&self, ctx: &CallContext, spender: Address, amount: U256) -> Result<bool> {
        let request = self.call_request(Some(ctx.sender), &TokenCall::Approve { spender, amount });

        let output = self
            .provider
            .inner()
            .call(&request)
            .await
            .context("approve call failed")?;

        let decoded = IERC20::approveCall::abi_decode_returns(&output, true)
            .context("Malformed approve return data")?;

        Ok(decoded._0)
    }

    #[instrument(skip_all, fields(to = %envelope.to, gas_limit = envelope.gas_limit))]
    async fn sign_transaction(
        &self,
        envelope: &TransactionEnvelope,
        key: &PrivateKey,
    ) -> Result<SignedTransaction> {
        let signer = signer_for(key)?;
        let sender = signer.address();
        let inner = self.provider.inner();

        // Chain-assigned fields come from the node.
        let nonce = inner
            .get_transaction_count(sender)
            .pending()
            .await
            .context("Failed to fetch sender nonce")?;
        let gas_price = inner
            .get_gas_price()
            .await
            .context("Failed to fetch gas price")?;

        let request = TransactionRequest::default()
            .with_from(sender)
            .with_to(envelope.to)
            .with_input(envelope.data.clone())
            .with_value(envelope.value)
            .with_gas_limit(envelope.gas_limit)
            .with_gas_price(gas_price)
            .with_nonce(nonce)
            .with_chain_id(self.provider.chain_id());

        let wallet = EthereumWallet::from(signer);
        let signed: TxEnvelope = TransactionBuilder::<Ethereum>::build(request, &wallet)
            .await
            .context("Failed to sign transaction")?;

        Ok(SignedTransaction {
            raw: Bytes::from(signed.encoded_2718()),
            hash: *signed.tx_hash(),
        })
    }

    #[instrument(skip_all, fields(tx_hash = %signed.hash))]
    async fn broadcast(&self, signed: &SignedTransaction) -> Result<TxHash> {
        let pending = self
            .provider
            .inner()
            .send_raw_transaction(&signed.raw)
            .await
            .context("Failed to broadcast transaction")?;

        let tx_hash = *pending.tx_hash();
        if !self.options.confirm_receipt {
            return Ok(tx_hash);
        }

        let receipt = pending
            .with_timeout(Some(self.options.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|e| unconfirmed(tx_hash, e))?;

        anyhow::ensure!(receipt.status(), "Transaction {tx_hash} reverted");

        info!(
            tx_hash = %tx_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction mined"
        );
        Ok(tx_hash)
    }

    async fn is_healthy(&self) -> bool {
        self.provider.is_healthy().await
    }
}
