//! HTTP API mode
//!
//! Serves a thin wallet API over HTTP for the lifetime of the process.
//! Endpoints:
//! - GET  /health
//! - GET  /api/status
//! - GET  /api/balance
//! - POST /api/address
//! - GET  /api/transactions?limit=20
//! - GET  /api/accounts

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::wallet::WalletHandle;

/// Shared application state
type AppState = Arc<WalletHandle>;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct AddressResponse {
    address: String,
}

/// Start the API server
pub async fn serve(addr: String, wallet: WalletHandle) -> Result<()> {
    serve_shared(addr, Arc::new(wallet)).await
}

/// Start the API server on an already shared wallet handle.
pub async fn serve_shared(addr: String, wallet: Arc<WalletHandle>) -> Result<()> {
    wallet.open_wallet().await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(wallet).layer(cors);

    info!("HTTP API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(wallet: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/balance", get(balance))
        .route("/api/address", post(address))
        .route("/api/transactions", get(transactions))
        .route("/api/accounts", get(accounts))
        .with_state(wallet)
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    "OK"
}

async fn status(State(wallet): State<AppState>) -> impl IntoResponse {
    match wallet.status().await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn balance(State(wallet): State<AppState>) -> impl IntoResponse {
    match wallet.balance().await {
        Ok(balance) => (StatusCode::OK, Json(balance)).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn address(State(wallet): State<AppState>) -> impl IntoResponse {
    match wallet.new_address().await {
        Ok(address) => (StatusCode::OK, Json(AddressResponse { address })).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Query parameters for the transactions endpoint
#[derive(Debug, Deserialize)]
struct TransactionsParams {
    limit: Option<usize>,
}

async fn transactions(
    State(wallet): State<AppState>,
    Query(params): Query<TransactionsParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(20);
    match wallet.transactions(limit).await {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn accounts(State(wallet): State<AppState>) -> impl IntoResponse {
    match wallet.accounts().await {
        Ok(accounts) => (StatusCode::OK, Json(accounts)).into_response(),
        Err(e) => internal_error(e),
    }
}

fn internal_error(e: anyhow::Error) -> axum::response::Response {
    let response = ErrorResponse {
        error: e.to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
}
