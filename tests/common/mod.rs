//! Shared test fixtures: a mockall `ChainService` and a scripted chain
//! that records what the use cases asked of it.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, B256, Bytes, TxHash, U256};
use mockall::mock;

use token_custody::domain::account::PrivateKey;
use token_custody::domain::amount::Amount;
use token_custody::ports::chain_service::{
    CallContext, ChainService, SignedTransaction, TokenCall, TransactionEnvelope,
};

mock! {
    pub Chain {}

    #[async_trait::async_trait]
    impl ChainService for Chain {
        fn token_address(&self) -> Address;
        fn derive_account(&self, key: &PrivateKey) -> anyhow::Result<Address>;
        fn encode_call(&self, call: &TokenCall) -> Bytes;
        async fn token_balance(&self, owner: Address) -> anyhow::Result<U256>;
        async fn native_balance(&self, owner: Address) -> anyhow::Result<U256>;
        async fn estimate_gas(&self, ctx: &CallContext, call: &TokenCall) -> anyhow::Result<u64>;
        async fn approve_call(
            &self,
            ctx: &CallContext,
            spender: Address,
            amount: U256,
        ) -> anyhow::Result<bool>;
        async fn sign_transaction(
            &self,
            envelope: &TransactionEnvelope,
            key: &PrivateKey,
        ) -> anyhow::Result<SignedTransaction>;
        async fn broadcast(&self, signed: &SignedTransaction) -> anyhow::Result<TxHash>;
        async fn is_healthy(&self) -> bool;
    }
}

pub const TOKEN: Address = Address::repeat_byte(0x70);
pub const RECIPIENT: &str = "0x2222222222222222222222222222222222222222";
pub const TX_HASH: TxHash = TxHash::repeat_byte(0xab);
pub const TRANSFER_PAYLOAD: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Key whose derived address is `Address::repeat_byte(byte)` on a
/// scripted chain.
pub fn key(byte: u8) -> PrivateKey {
    PrivateKey::from_bytes(B256::repeat_byte(byte))
}

/// Whole-token amount in base units.
pub fn tokens(text: &str) -> U256 {
    text.parse::<Amount>().unwrap().base_units()
}

/// Calls observed by a scripted chain.
#[derive(Debug, Default)]
pub struct Recorded {
    pub balance_owners: Vec<Address>,
    /// `(sender, transfer amount)` of each estimate.
    pub estimates: Vec<(Address, U256)>,
    /// `(sender, approve amount)` of each approval call.
    pub approvals: Vec<(Address, U256)>,
    pub envelopes: Vec<TransactionEnvelope>,
    pub broadcasts: usize,
    /// Every sender-scoped call in arrival order.
    pub sender_calls: Vec<Address>,
}

/// Behaviour of a scripted chain. Every step succeeds by default.
#[derive(Debug, Clone)]
pub struct ChainScript {
    /// Token balance of every owner, in whole tokens.
    pub token_balance: &'static str,
    pub native_balance: &'static str,
    pub estimate: u64,
    pub approved: bool,
    pub derive_error: Option<&'static str>,
    pub balance_error: Option<&'static str>,
    pub native_error: Option<&'static str>,
    pub estimate_error: Option<&'static str>,
    pub approve_error: Option<&'static str>,
    pub sign_error: Option<&'static str>,
    pub broadcast_error: Option<&'static str>,
    pub healthy: bool,
}

impl Default for ChainScript {
    fn default() -> Self {
        Self {
            token_balance: "100",
            native_balance: "1",
            estimate: 50_000,
            approved: true,
            derive_error: None,
            balance_error: None,
            native_error: None,
            estimate_error: None,
            approve_error: None,
            sign_error: None,
            broadcast_error: None,
            healthy: true,
        }
    }
}

fn fail_or<T>(error: Option<&'static str>, value: T) -> anyhow::Result<T> {
    match error {
        Some(message) => Err(anyhow::anyhow!(message)),
        None => Ok(value),
    }
}

impl ChainScript {
    /// Build the mock and the shared log of what it was asked.
    pub fn build(self) -> (MockChain, Arc<Mutex<Recorded>>) {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let mut chain = MockChain::new();

        chain.expect_token_address().return_const(TOKEN);

        let derive_error = self.derive_error;
        chain
            .expect_derive_account()
            .returning(move |key| fail_or(derive_error, Address::repeat_byte(key.as_bytes()[0])));

        chain
            .expect_encode_call()
            .returning(|_| Bytes::from_static(&TRANSFER_PAYLOAD));

        let balance = tokens(self.token_balance);
        let balance_error = self.balance_error;
        let log = Arc::clone(&recorded);
        chain.expect_token_balance().returning(move |owner| {
            let mut log = log.lock().unwrap();
            log.balance_owners.push(owner);
            log.sender_calls.push(owner);
            fail_or(balance_error, balance)
        });

        let native = tokens(self.native_balance);
        let native_error = self.native_error;
        chain
            .expect_native_balance()
            .returning(move |_| fail_or(native_error, native));

        let estimate = self.estimate;
        let estimate_error = self.estimate_error;
        let log = Arc::clone(&recorded);
        chain.expect_estimate_gas().returning(move |ctx, call| {
            let amount = match *call {
                TokenCall::Transfer { amount, .. } => amount,
                _ => U256::ZERO,
            };
            let mut log = log.lock().unwrap();
            log.estimates.push((ctx.sender, amount));
            log.sender_calls.push(ctx.sender);
            fail_or(estimate_error, estimate)
        });

        let approved = self.approved;
        let approve_error = self.approve_error;
        let log = Arc::clone(&recorded);
        chain.expect_approve_call().returning(move |ctx, _, amount| {
            let mut log = log.lock().unwrap();
            log.approvals.push((ctx.sender, amount));
            log.sender_calls.push(ctx.sender);
            fail_or(approve_error, approved)
        });

        let sign_error = self.sign_error;
        let log = Arc::clone(&recorded);
        chain.expect_sign_transaction().returning(move |envelope, _| {
            log.lock().unwrap().envelopes.push(envelope.clone());
            fail_or(
                sign_error,
                SignedTransaction {
                    raw: Bytes::from_static(&[0x02, 0xf8]),
                    hash: TX_HASH,
                },
            )
        });

        let broadcast_error = self.broadcast_error;
        let log = Arc::clone(&recorded);
        chain.expect_broadcast().returning(move |signed| {
            log.lock().unwrap().broadcasts += 1;
            fail_or(broadcast_error, signed.hash)
        });

        let healthy = self.healthy;
        chain.expect_is_healthy().returning(move || healthy);

        (chain, recorded)
    }
}

/// Delegates to a mock but yields to the scheduler before every async
/// call, so pipelines joined on one task interleave between chain calls.
pub struct Yielding<C>(pub C);

#[async_trait::async_trait]
impl<C: ChainService> ChainService for Yielding<C> {
    fn token_address(&self) -> Address {
        self.0.token_address()
    }

    fn derive_account(&self, key: &PrivateKey) -> anyhow::Result<Address> {
        self.0.derive_account(key)
    }

    fn encode_call(&self, call: &TokenCall) -> Bytes {
        self.0.encode_call(call)
    }

    async fn token_balance(&self, owner: Address) -> anyhow::Result<U256> {
        tokio::task::yield_now().await;
        self.0.token_balance(owner).await
    }

    async fn native_balance(&self, owner: Address) -> anyhow::Result<U256> {
        tokio::task::yield_now().await;
        self.0.native_balance(owner).await
    }

    async fn estimate_gas(&self, ctx: &CallContext, call: &TokenCall) -> anyhow::Result<u64> {
        tokio::task::yield_now().await;
        self.0.estimate_gas(ctx, call).await
    }

    async fn approve_call(
        &self,
        ctx: &CallContext,
        spender: Address,
        amount: U256,
    ) -> anyhow::Result<bool> {
        tokio::task::yield_now().await;
        self.0.approve_call(ctx, spender, amount).await
    }

    async fn sign_transaction(
        &self,
        envelope: &TransactionEnvelope,
        key: &PrivateKey,
    ) -> anyhow::Result<SignedTransaction> {
        tokio::task::yield_now().await;
        self.0.sign_transaction(envelope, key).await
    }

    async fn broadcast(&self, signed: &SignedTransaction) -> anyhow::Result<TxHash> {
        tokio::task::yield_now().await;
        self.0.broadcast(signed).await
    }

    async fn is_healthy(&self) -> bool {
        self.0.is_healthy().await
    }
}
