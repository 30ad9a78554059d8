//! Transfer Orchestrator Use Case - Guarded ERC-20 Transfers
//!
//! Runs one token transfer from a custodial account as a linear pipeline:
//!
//! 1. Derive the sender from the private key and build its `CallContext`
//! 2. Read the sender's token balance
//! 3. Convert the requested amount to base units
//! 4. Encode the `transfer(recipient, amount)` payload
//! 5. Estimate gas for that transfer
//! 6. Run the read-only `approve(recipient, amount)` precondition call
//! 7. Guards, first match wins: gas, then balance, then approval
//! 8. Sign the envelope with the caller's gas limit
//! 9. Broadcast
//!
//! Every failure is returned as a `TransferError`; nothing is retried.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use anyhow::Context;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::amount::Amount;
use crate::domain::transfer::{TransferError, TransferOutcome, TransferRequest};
use crate::ports::chain_service::{
  CallContext, ChainService, TokenCall, TransactionEnvelope,
};

/// On-chain readings gathered before any guard is evaluated.
#[derive(Debug, Clone)]
struct Preflight {
  /// Sender token balance.
  balance: Amount,
  /// Requested amount.
  amount: Amount,
  /// Encoded `transfer` call, reused as the transaction payload.
  payload: Bytes,
  /// Gas the node expects the transfer to consume.
  estimated_gas: u64,
  /// Result of the `approve` precondition call.
  approved: bool,
}

/// Issues guarded token transfers through a `ChainService`.
///
/// Holds no per-request state, so one orchestrator can serve any number
/// of concurrent transfers.
pub struct TransferOrchestrator<C: ChainService> {
  chain: Arc<C>,
}

impl<C: ChainService> TransferOrchestrator<C> {
  /// Create a new orchestrator over a shared chain service.
  pub fn new(chain: Arc<C>) -> Self {
    Self { chain }
  }

  /// Attempt a single transfer and report its outcome.
  ///
  /// Never panics and never returns a partially built result: the caller
  /// gets either the transaction hash or exactly one error.
  #[instrument(
    skip_all,
    fields(
      request_id = %Uuid::new_v4(),
      recipient = %request.recipient,
      amount = %request.amount,
      gas_limit = request.gas_limit,
    )
  )]
  pub async fn transfer(&self, request: &TransferRequest) -> TransferOutcome {
    let outcome = self.execute(request).await;

    match &outcome {
      Ok(tx_hash) => info!(tx_hash = %tx_hash, "Transfer broadcast"),
      Err(e) => warn!(kind = %e.kind(), error = %e, "Transfer failed"),
    }

    outcome
  }

  async fn execute(&self, request: &TransferRequest) -> TransferOutcome {
    let preflight = self
      .preflight(request)
      .await
      .map_err(|e| TransferError::Unexpected(format!("{e:#}")))?;

    if let Some(rejection) = first_failed_guard(request.gas_limit, &preflight) {
      return Err(rejection);
    }

    // The estimate only gates the transfer; the caller's limit is what gets signed.
    let envelope = TransactionEnvelope {
      to: self.chain.token_address(),
      data: preflight.payload,
      gas_limit: request.gas_limit,
      value: U256::ZERO,
    };

    let signed = self
      .chain
      .sign_transaction(&envelope, &request.sender_key)
      .await
      .map_err(|e| TransferError::SignFailed(format!("{e:#}")))?;

    debug!(tx_hash = %signed.hash, "Transaction signed");

    self
      .chain
      .broadcast(&signed)
      .await
      .map_err(|e| TransferError::SendFailed(format!("{e:#}")))
  }

  /// Every read the guards depend on, in pipeline order.
  async fn preflight(&self, request: &TransferRequest) -> anyhow::Result<Preflight> {
    let sender = self
      .chain
      .derive_account(&request.sender_key)
      .context("Failed to derive sender account")?;
    let ctx = CallContext::new(sender);

    let balance = self
      .chain
      .token_balance(ctx.sender)
      .await
      .context("Failed to read sender token balance")?;
    let balance = Amount::from_base_units(balance);

    let amount = Amount::parse_decimal(&request.amount).context("Invalid transfer amount")?;

    let recipient: Address = request
      .recipient
      .parse()
      .context("Invalid recipient address")?;
    let transfer = TokenCall::Transfer {
      to: recipient,
      amount: amount.base_units(),
    };
    let payload = self.chain.encode_call(&transfer);

    let estimated_gas = self
      .chain
      .estimate_gas(&ctx, &transfer)
      .await
      .context("Failed to estimate transfer gas")?;

    let approved = self
      .chain
      .approve_call(&ctx, recipient, amount.base_units())
      .await
      .context("Approval check failed")?;

    debug!(
      sender = %ctx.sender,
      balance = %balance,
      estimated_gas,
      approved,
      "Preflight complete"
    );

    Ok(Preflight {
      balance,
      amount,
      payload,
      estimated_gas,
      approved,
    })
  }
}

/// Evaluate the guards in fixed order and return the first that fails.
fn first_failed_guard(gas_limit: u64, preflight: &Preflight) -> Option<TransferError> {
  if preflight.estimated_gas > gas_limit {
    Some(TransferError::GasInsufficient {
      required: preflight.estimated_gas,
    })
  } else if preflight.balance < preflight.amount {
    debug!(
      balance = %preflight.balance,
      requested = %preflight.amount,
      "Token balance too low"
    );
    Some(TransferError::BalanceInsufficient)
  } else if !preflight.approved {
    Some(TransferError::NotApproved)
  } else {
    None
  }
}
