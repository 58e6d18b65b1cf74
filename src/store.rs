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

//! The persistence boundary of the wallet engine.
//!
//! [`LedgerStore`] is the only interface the engine uses to reach durable
//! storage. [`MemoryLedger`] is the in-process implementation backing the
//! server binary and the test suite; a database-backed store plugs in behind
//! the same trait.

use crate::base::PlayerId;
use crate::error::StoreError;
use crate::transaction::Transaction;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Durable, append-only transaction storage, partitioned by player.
///
/// # Contract
///
/// - [`query`](LedgerStore::query) returns every previously acknowledged
///   transaction for the player, newest first. No partial or unacknowledged
///   record is ever visible.
/// - [`append`](LedgerStore::append) must be durable before it returns
///   `Ok`. On `Err` the ledger is unchanged and the transaction is
///   considered not to have happened.
///
/// Implementations do their own retrying if they want any; the engine calls
/// each method exactly once per operation.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn query(&self, player: &PlayerId) -> Result<Vec<Transaction>, StoreError>;

    async fn append(&self, transaction: Transaction) -> Result<(), StoreError>;
}

/// In-process [`LedgerStore`] with no durability beyond the process.
///
/// Transactions are kept per player in append order. Appends arrive in
/// `created_at` order for a given player (the engine serializes writers), so
/// reversing on query yields the newest-first contract.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<HashMap<PlayerId, Vec<Transaction>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn query(&self, player: &PlayerId) -> Result<Vec<Transaction>, StoreError> {
        let entries = self.entries.read();
        let transactions = entries
            .get(player)
            .map(|log| log.iter().rev().cloned().collect())
            .unwrap_or_default();
        Ok(transactions)
    }

    async fn append(&self, transaction: Transaction) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        entries
            .entry(transaction.player_id.clone())
            .or_default()
            .push(transaction);
        Ok(())
    }
}
