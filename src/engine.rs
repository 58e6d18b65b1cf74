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

//! The balance/cache engine.
//!
//! [`WalletEngine`] owns a per-player materialized view of transaction
//! history, derives balances from it, and enforces that a debit only
//! succeeds when the computed balance covers it.
//!
//! # Caching
//!
//! Each cache entry is either absent or populated, nothing in between.
//! A view is populated lazily on the first read after a miss, and evicted
//! (never patched in place) immediately after a successful write for that
//! player. Patching a live view could race with a concurrent reload and
//! leave stale or duplicated entries; eviction makes the next read rebuild
//! from the store, which can never diverge.
//!
//! # Thread safety
//!
//! The cache and lock table use [`DashMap`], so operations for different
//! players never contend. For a single player, balance-check-and-append
//! runs under a `tokio` mutex held across the whole sequence; without it,
//! two concurrent debits could both observe a sufficient balance and both
//! append, over-drawing the wallet. Cache hits take no per-player lock.

use crate::base::{PlayerId, TransactionId};
use crate::error::StoreError;
use crate::store::LedgerStore;
use crate::transaction::Transaction;
use crate::{TransactionKind, WalletError};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Balance/cache engine for player wallets.
///
/// The engine is the exclusive owner of the per-player cached views; read
/// access hands out shared immutable slices and nothing else can mutate
/// them. All storage access goes through the [`LedgerStore`] boundary.
///
/// # Invariants
///
/// - Transaction amounts are strictly positive; direction lives in the kind.
/// - The ledger is append-only: the engine never mutates or deletes a
///   persisted transaction.
/// - A populated view always equals what a fresh store query would return
///   at the time it was installed.
pub struct WalletEngine {
    store: Arc<dyn LedgerStore>,
    /// Per-player materialized views, keyed by normalized player id.
    cache: DashMap<PlayerId, Arc<[Transaction]>>,
    /// Per-player write locks. Entries accumulate with the set of players
    /// seen by this process and are never reclaimed.
    write_locks: DashMap<PlayerId, Arc<Mutex<()>>>,
}

impl WalletEngine {
    /// Creates an engine with an empty cache on top of the given store.
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            cache: DashMap::new(),
            write_locks: DashMap::new(),
        }
    }

    /// Returns the player's transaction history, newest first.
    ///
    /// A cache hit returns the shared view with no store access. A miss
    /// takes the player's lock, re-checks the cache, and queries the store
    /// at most once regardless of how many readers raced to populate.
    ///
    /// # Errors
    ///
    /// Only by propagating a [`StoreError`] from the query.
    pub async fn transactions(
        &self,
        player: &PlayerId,
    ) -> Result<Arc<[Transaction]>, WalletError> {
        if let Some(cached) = self.cache.get(player) {
            return Ok(Arc::clone(cached.value()));
        }

        let lock = self.player_lock(player);
        let _guard = lock.lock().await;
        Ok(self.load(player).await?)
    }

    /// Computes the player's balance: sum of credits minus sum of debits.
    ///
    /// A player with no transactions has a balance of exactly zero.
    ///
    /// # Errors
    ///
    /// Only by propagating a [`StoreError`] from the underlying read.
    pub async fn balance(&self, player: &PlayerId) -> Result<Decimal, WalletError> {
        let transactions = self.transactions(player).await?;
        Ok(balance_of(&transactions))
    }

    /// Validates, persists, and returns the id of a new transaction.
    ///
    /// Steps, with everything after validation under the player's write
    /// lock so no other write for the same player interleaves:
    ///
    /// 1. Reject non-positive amounts.
    /// 2. Compute the current balance (may populate the cache).
    /// 3. Reject a debit the balance does not cover.
    /// 4. Build the record with a fresh id and timestamp.
    /// 5. Append to the store; a failure here leaves cache and ledger as
    ///    they were.
    /// 6. Evict the player's cached view.
    ///
    /// # Cancellation
    ///
    /// If the future is dropped while the append is in flight, the write may
    /// or may not have landed in the store. The cached view is evicted on
    /// drop in that window, so the next read rebuilds from the store and
    /// observes whichever outcome it durably chose. A miss after eviction is
    /// always a valid, retryable state.
    ///
    /// # Errors
    ///
    /// - [`WalletError::InvalidAmount`] - amount is zero or negative.
    /// - [`WalletError::InsufficientFunds`] - debit exceeds the balance.
    /// - [`WalletError::Store`] - the append failed; nothing happened.
    pub async fn create_transaction(
        &self,
        player: &PlayerId,
        amount: Decimal,
        kind: TransactionKind,
        reference: impl Into<String>,
    ) -> Result<TransactionId, WalletError> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::InvalidAmount);
        }

        let lock = self.player_lock(player);
        let _guard = lock.lock().await;

        let balance = balance_of(&self.load(player).await?);
        if kind == TransactionKind::Debit && balance < amount {
            return Err(WalletError::InsufficientFunds);
        }

        let transaction = Transaction::new(player.clone(), amount, kind, reference);
        let id = transaction.id;

        let mut evict = EvictOnDrop::armed(&self.cache, player);
        if let Err(e) = self.store.append(transaction).await {
            // Nothing was written; the cached view must stay as it was.
            evict.disarm();
            return Err(e.into());
        }
        drop(evict);

        debug!(player = %player, transaction = %id, "transaction appended, cached view evicted");
        Ok(id)
    }

    /// Cache-or-store read. Callers must hold the player's write lock; the
    /// re-check under the lock is what makes population single-flight.
    async fn load(&self, player: &PlayerId) -> Result<Arc<[Transaction]>, StoreError> {
        if let Some(cached) = self.cache.get(player) {
            return Ok(Arc::clone(cached.value()));
        }

        debug!(player = %player, "cache miss, querying ledger store");
        let transactions: Arc<[Transaction]> = self.store.query(player).await?.into();
        self.cache.insert(player.clone(), Arc::clone(&transactions));
        Ok(transactions)
    }

    fn player_lock(&self, player: &PlayerId) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(player.clone())
            .or_default()
            .value()
            .clone()
    }
}

/// Signed sum over a transaction set. Decimal throughout; no floating-point
/// accumulation anywhere in the money path.
fn balance_of(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(|t| t.signed_amount()).sum()
}

/// Evicts a player's cached view when dropped, unless disarmed.
///
/// Armed across the store append: if the creating future is cancelled while
/// the write is in flight, the drop still runs and the cache cannot keep
/// serving a pre-write view.
struct EvictOnDrop<'a> {
    cache: &'a DashMap<PlayerId, Arc<[Transaction]>>,
    player: &'a PlayerId,
    armed: bool,
}

impl<'a> EvictOnDrop<'a> {
    fn armed(cache: &'a DashMap<PlayerId, Arc<[Transaction]>>, player: &'a PlayerId) -> Self {
        Self {
            cache,
            player,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for EvictOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.remove(self.player);
        }
    }
}
