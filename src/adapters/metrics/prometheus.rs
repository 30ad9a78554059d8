//! Prometheus Metrics Registry - Custody Observability
//!
//! Registers the service's Prometheus metrics and renders them in text
//! exposition format for the `/metrics` endpoint. Covers wallet
//! generation, balance reads and transfer outcomes/latency.

use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

use crate::domain::balance::BalanceReport;
use crate::domain::transfer::TransferOutcome;

/// Outcome label for successful operations.
const OK: &str = "ok";

/// Centralized Prometheus metrics for the custody service.
///
/// All metrics follow the naming convention `token_custody_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Wallets generated.
    pub wallets_generated: IntCounter,
    /// Balance reads by outcome (`ok` / `read_failed`).
    pub balance_reads: IntCounterVec,
    /// Transfers by outcome (`ok` or the error kind).
    pub transfers: IntCounterVec,
    /// End-to-end transfer latency in seconds, by outcome.
    pub transfer_latency_seconds: HistogramVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let wallets_generated = IntCounter::new(
            "token_custody_wallets_generated_total",
            "Total wallets generated",
        )?;

        let balance_reads = IntCounterVec::new(
            Opts::new("token_custody_balance_reads_total", "Total balance reads"),
            &["outcome"],
        )?;

        let transfers = IntCounterVec::new(
            Opts::new("token_custody_transfers_total", "Total transfer attempts"),
            &["outcome"],
        )?;

        let transfer_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "token_custody_transfer_latency_seconds",
                "Transfer latency from request to outcome in seconds",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 15.0, 30.0, 60.0, 120.0]),
            &["outcome"],
        )?;

        // Register all metrics
        registry.register(Box::new(wallets_generated.clone()))?;
        registry.register(Box::new(balance_reads.clone()))?;
        registry.register(Box::new(transfers.clone()))?;
        registry.register(Box::new(transfer_latency_seconds.clone()))?;

        Ok(Self {
            registry,
            wallets_generated,
            balance_reads,
            transfers,
            transfer_latency_seconds,
        })
    }

    /// Count a generated wallet.
    pub fn record_wallet(&self) {
        self.wallets_generated.inc();
    }

    /// Count a balance read by outcome.
    pub fn record_balance_read(&self, report: &BalanceReport) {
        let outcome = if report.is_ok() { OK } else { "read_failed" };
        self.balance_reads.with_label_values(&[outcome]).inc();
    }

    /// Count a transfer and observe its latency.
    pub fn record_transfer(&self, outcome: &TransferOutcome, elapsed: Duration) {
        let label = match outcome {
            Ok(_) => OK,
            Err(e) => e.kind().as_str(),
        };
        self.transfers.with_label_values(&[label]).inc();
        self.transfer_latency_seconds
            .with_label_values(&[label])
            .observe(elapsed.as_secs_f64());
    }

    /// Render all metrics in Prometheus text format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
