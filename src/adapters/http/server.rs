//! HTTP API Server - Custody Endpoints, Health Checks and Metrics
//!
//! Serves the three custody operations over axum 0.7, plus liveness
//! (/live) and readiness (/ready) checks and Prometheus `/metrics`.
//! Readiness depends on the chain connection and on the server not
//! shutting down.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::broadcast;
use tracing::{error, info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::transfer::TransferError;
use crate::ports::chain_service::ChainService;
use crate::usecases::{BalanceReader, TransferOrchestrator, WalletGenerator};

use super::types::{BalanceResponse, TransferBody, TransferResponse, WalletResponse};

/// Shared flag flipped off when graceful shutdown starts.
#[derive(Debug)]
pub struct HealthState {
    accepting: AtomicBool,
}

impl HealthState {
    /// Create a new health state (accepting traffic).
    pub const fn new() -> Self {
        Self {
            accepting: AtomicBool::new(true),
        }
    }

    /// Stop reporting ready (readiness check → 503).
    pub fn begin_shutdown(&self) {
        self.accepting.store(false, Ordering::Relaxed);
    }

    /// Whether the server still accepts traffic.
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Relaxed)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the handlers need, shared behind an `Arc`.
pub struct ApiState<C: ChainService> {
    pub wallets: WalletGenerator,
    pub balances: BalanceReader<C>,
    pub transfers: TransferOrchestrator<C>,
    pub chain: Arc<C>,
    /// `None` when metrics are disabled.
    pub metrics: Option<Arc<MetricsRegistry>>,
    pub health: Arc<HealthState>,
}

impl<C: ChainService> ApiState<C> {
    /// Wire the use cases over one shared chain service.
    pub fn new(
        chain: Arc<C>,
        metrics: Option<Arc<MetricsRegistry>>,
        health: Arc<HealthState>,
    ) -> Self {
        Self {
            wallets: WalletGenerator::new(),
            balances: BalanceReader::new(Arc::clone(&chain)),
            transfers: TransferOrchestrator::new(Arc::clone(&chain)),
            chain,
            metrics,
            health,
        }
    }
}

/// Build the API router.
pub fn router<C: ChainService>(state: Arc<ApiState<C>>) -> Router {
    Router::new()
        .route("/wallets", post(create_wallet::<C>))
        .route("/balances/:address", get(get_balances::<C>))
        .route("/transfers", post(create_transfer::<C>))
        .route("/live", get(liveness))
        .route("/ready", get(readiness::<C>))
        .route("/metrics", get(render_metrics::<C>))
        .with_state(state)
}

/// Axum-based HTTP server for the custody API.
pub struct ApiServer<C: ChainService> {
    state: Arc<ApiState<C>>,
    bind_address: String,
}

impl<C: ChainService> ApiServer<C> {
    /// Create a new API server.
    pub fn new(state: Arc<ApiState<C>>, bind_address: String) -> Self {
        Self {
            state,
            bind_address,
        }
    }

    /// Serve until a shutdown signal arrives, then drain in-flight requests.
    #[instrument(skip(self, shutdown_rx), fields(address = %self.bind_address))]
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let app = router(Arc::clone(&self.state));
        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;

        info!(address = %self.bind_address, "API server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

async fn create_wallet<C: ChainService>(
    State(state): State<Arc<ApiState<C>>>,
) -> Json<WalletResponse> {
    let account = state.wallets.generate();
    if let Some(metrics) = &state.metrics {
        metrics.record_wallet();
    }
    Json(WalletResponse::from(account))
}

async fn get_balances<C: ChainService>(
    State(state): State<Arc<ApiState<C>>>,
    Path(address): Path<String>,
) -> Json<BalanceResponse> {
    let report = state.balances.read(&address).await;
    if let Some(metrics) = &state.metrics {
        metrics.record_balance_read(&report);
    }
    Json(BalanceResponse::from(report))
}

/// Malformed bodies still get a transfer result, with an `unexpected` error.
async fn create_transfer<C: ChainService>(
    State(state): State<Arc<ApiState<C>>>,
    body: Result<Json<TransferBody>, JsonRejection>,
) -> Json<TransferResponse> {
    let started = Instant::now();
    let request = match body {
        Ok(Json(body)) => body.into_request(),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected transfer body");
            Err(TransferError::Unexpected(rejection.body_text()))
        }
    };
    let outcome = match request {
        Ok(request) => state.transfers.transfer(&request).await,
        Err(e) => Err(e),
    };
    if let Some(metrics) = &state.metrics {
        metrics.record_transfer(&outcome, started.elapsed());
    }
    Json(TransferResponse::from(outcome))
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness check: 200 only if the chain is reachable and not shutting down.
async fn readiness<C: ChainService>(State(state): State<Arc<ApiState<C>>>) -> impl IntoResponse {
    if state.health.is_accepting() && state.chain.is_healthy().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

async fn render_metrics<C: ChainService>(State(state): State<Arc<ApiState<C>>>) -> impl IntoResponse {
    let Some(metrics) = &state.metrics else {
        return (StatusCode::NOT_FOUND, String::new());
    };

    match metrics.render() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}
