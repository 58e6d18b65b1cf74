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

//! # Player Wallet
//!
//! This library tracks a player's monetary transactions (credits and debits)
//! and derives the current balance on demand from an append-only ledger,
//! with a per-player cache of transaction history kept consistent with the
//! ledger under concurrent writers.
//!
//! ## Core Components
//!
//! - [`WalletEngine`]: the balance/cache engine; enforces that a debit only
//!   succeeds when the computed balance covers it
//! - [`Transaction`]: immutable ledger record ([`TransactionKind::Credit`]
//!   or [`TransactionKind::Debit`], always positive amounts)
//! - [`LedgerStore`]: the persistence boundary; [`MemoryLedger`] is the
//!   in-process implementation
//! - [`WalletError`]: discriminated error taxonomy for wallet operations
//!
//! ## Example
//!
//! ```
//! use player_wallet_rs::{MemoryLedger, PlayerId, TransactionKind, WalletEngine};
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let engine = WalletEngine::new(Arc::new(MemoryLedger::new()));
//! let player = PlayerId::new("P1");
//!
//! // A fresh player has a balance of exactly zero.
//! assert_eq!(engine.balance(&player).await.unwrap(), dec!(0));
//!
//! engine
//!     .create_transaction(&player, dec!(12.67), TransactionKind::Credit, "WELCOME")
//!     .await
//!     .unwrap();
//!
//! assert_eq!(engine.balance(&player).await.unwrap(), dec!(12.67));
//! # });
//! ```
//!
//! ## Thread Safety
//!
//! The engine accepts concurrent callers. Operations for different players
//! never contend; balance-check-and-append for a single player is serialized
//! internally, so concurrent debits can never over-draw a wallet.

mod base;
mod engine;
pub mod error;
pub mod store;
mod transaction;

pub use base::{PlayerId, TransactionId};
pub use engine::WalletEngine;
pub use error::{StoreError, WalletError};
pub use store::{LedgerStore, MemoryLedger};
pub use transaction::{Transaction, TransactionKind};
