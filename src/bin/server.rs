// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! REST API server for the wallet engine.
//!
//! ## Endpoints
//!
//! - `POST /api/players/{player_id}/transactions` - Create a credit or debit
//! - `GET  /api/players/{player_id}/transactions` - Transaction history, newest first
//! - `GET  /api/players/{player_id}/balance` - Current balance
//!
//! ## Example Usage
//!
//! ```bash
//! curl -X POST http://localhost:3000/api/players/p1/transactions \
//!   -H "Content-Type: application/json" \
//!   -d '{"amount": "100.00", "transaction_type": "credit", "reference": "PROMO"}'
//!
//! curl http://localhost:3000/api/players/p1/balance
//! ```
//!
//! All validation beyond request shape, and every invariant, lives in the
//! engine; this binary only parses, forwards, and maps outcomes to status
//! codes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use player_wallet_rs::{
    MemoryLedger, PlayerId, Transaction, TransactionId, TransactionKind, WalletEngine, WalletError,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Player Wallet API - serve wallet operations over HTTP
#[derive(Parser, Debug)]
#[command(name = "player-wallet-rs")]
#[command(about = "REST API for player wallet transactions and balances", long_about = None)]
struct Args {
    /// Address to bind the HTTP listener on
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

// === Request/Response DTOs ===

/// Request body for creating a transaction.
///
/// Amounts travel as strings and the kind is parsed case-insensitively:
/// ```json
/// {"amount": "12.67", "transaction_type": "Credit", "reference": "PROMO"}
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub amount: Decimal,
    pub transaction_type: String,
    #[serde(default)]
    pub reference: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: TransactionId,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub player_id: PlayerId,
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<WalletEngine>,
}

// === Error Handling ===

/// Wrapper for converting [`WalletError`] into HTTP responses.
pub struct AppError(WalletError);

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            WalletError::InvalidAmount => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            WalletError::UnknownKind(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_KIND"),
            WalletError::InsufficientFunds => (StatusCode::CONFLICT, "INSUFFICIENT_FUNDS"),
            WalletError::Store(_) => (StatusCode::UNPROCESSABLE_ENTITY, "STORE_FAILURE"),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /api/players/{player_id}/transactions
async fn create_transaction(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let kind: TransactionKind = request.transaction_type.parse()?;
    let id = state
        .engine
        .create_transaction(&player_id, request.amount, kind, request.reference)
        .await?;
    Ok(Json(CreatedResponse { id }))
}

/// GET /api/players/{player_id}/transactions
async fn get_transactions(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.engine.transactions(&player_id).await?;
    Ok(Json(transactions.to_vec()))
}

/// GET /api/players/{player_id}/balance
async fn get_balance(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state.engine.balance(&player_id).await?;
    Ok(Json(BalanceResponse { player_id, balance }))
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/players/{player_id}/transactions",
            post(create_transaction).get(get_transactions),
        )
        .route("/api/players/{player_id}/balance", get(get_balance))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let state = AppState {
        engine: Arc::new(WalletEngine::new(Arc::new(MemoryLedger::new()))),
    };
    let app = create_router(state);

    let listener = match TcpListener::bind(args.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Error binding to {}: {}", args.bind, e);
            process::exit(1);
        }
    };

    info!(addr = %args.bind, "wallet API listening");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        process::exit(1);
    }
}
