//! Chain Service Port - On-chain Interaction Interface
//!
//! Defines the trait the use cases need from the blockchain: account
//! derivation, ERC-20 reads, gas estimation, local signing and broadcast.
//! Sender-dependent calls take an explicit `CallContext` instead of relying
//! on a "default account" stored on a shared client, so concurrent
//! requests never see each other's sender.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use crate::domain::account::PrivateKey;

/// Per-invocation context for contract calls made on behalf of a sender.
///
/// Built once from the derived sender address and passed by reference to
/// every call in that invocation. Never stored on the chain service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
  /// Address used as `from` for calls and estimates.
  pub sender: Address,
}

impl CallContext {
  /// Create a context for `sender`.
  pub const fn new(sender: Address) -> Self {
    Self { sender }
  }
}

/// A call against the configured token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCall {
  /// `balanceOf(owner)`.
  BalanceOf { owner: Address },
  /// `transfer(to, amount)`.
  Transfer { to: Address, amount: U256 },
  /// `approve(spender, amount)`.
  Approve { spender: Address, amount: U256 },
}

/// Unsigned transaction to be signed by the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEnvelope {
  /// Destination (the token contract).
  pub to: Address,
  /// ABI-encoded call payload.
  pub data: Bytes,
  /// Gas limit for the transaction.
  pub gas_limit: u64,
  /// Native value attached (zero for token transfers).
  pub value: U256,
}

/// A signed, broadcast-ready transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
  /// EIP-2718 encoded raw transaction.
  pub raw: Bytes,
  /// Hash of the signed transaction.
  pub hash: TxHash,
}

/// Trait for on-chain interactions via alloy-rs.
///
/// Amounts cross this boundary as raw base units (`U256`); conversion to
/// and from decimal is the caller's concern.
#[async_trait]
pub trait ChainService: Send + Sync + 'static {
  /// Address of the token contract all `TokenCall`s target.
  fn token_address(&self) -> Address;

  /// Derive the address controlled by `key`.
  fn derive_account(&self, key: &PrivateKey) -> anyhow::Result<Address>;

  /// ABI-encode a token call.
  fn encode_call(&self, call: &TokenCall) -> Bytes;

  /// Read the token balance of `owner` in base units.
  async fn token_balance(&self, owner: Address) -> anyhow::Result<U256>;

  /// Read the native-coin balance of `owner` in base units.
  async fn native_balance(&self, owner: Address) -> anyhow::Result<U256>;

  /// Estimate the gas `ctx.sender` would spend executing `call`.
  async fn estimate_gas(&self, ctx: &CallContext, call: &TokenCall) -> anyhow::Result<u64>;

  /// Execute `approve(spender, amount)` as a read-only call from
  /// `ctx.sender` and return its boolean result. Submits nothing.
  async fn approve_call(
    &self,
    ctx: &CallContext,
    spender: Address,
    amount: U256,
  ) -> anyhow::Result<bool>;

  /// Sign `envelope` with `key`. Chain-assigned fields (nonce, chain id,
  /// gas price) are filled by the implementation.
  async fn sign_transaction(
    &self,
    envelope: &TransactionEnvelope,
    key: &PrivateKey,
  ) -> anyhow::Result<SignedTransaction>;

  /// Broadcast a signed transaction and return its hash.
  async fn broadcast(&self, signed: &SignedTransaction) -> anyhow::Result<TxHash>;

  /// Check if the chain connection is healthy.
  async fn is_healthy(&self) -> bool;
}
