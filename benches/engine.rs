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

//! Benchmarks for the wallet engine.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Cache-hit history and balance reads
//! - Balance derivation scaling with history size
//! - Transaction creation (write + eviction + rebuild on next read)
//! - Concurrent multi-player throughput

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use player_wallet_rs::{MemoryLedger, PlayerId, TransactionKind, WalletEngine};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::runtime::Runtime;

// =============================================================================
// Helper Functions
// =============================================================================

fn fresh_engine() -> Arc<WalletEngine> {
    Arc::new(WalletEngine::new(Arc::new(MemoryLedger::new())))
}

/// Seeds a wallet with `transactions` credits and warms the cache, so read
/// benchmarks measure the hit path.
fn seeded_engine(rt: &Runtime, transactions: usize) -> (Arc<WalletEngine>, PlayerId) {
    let engine = fresh_engine();
    let player = PlayerId::new("bench");

    rt.block_on(async {
        for i in 0..transactions {
            let amount = Decimal::new(100 + (i as i64 % 900), 2);
            engine
                .create_transaction(&player, amount, TransactionKind::Credit, "")
                .await
                .unwrap();
        }
        engine.transactions(&player).await.unwrap();
    });

    (engine, player)
}

// =============================================================================
// Read Path
// =============================================================================

fn bench_cached_history_read(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let (engine, player) = seeded_engine(&rt, 1_000);

    c.bench_function("cached_history_read", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(engine.transactions(&player).await.unwrap());
        })
    });
}

fn bench_balance_scaling(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("balance_by_history_size");

    for size in [100usize, 1_000, 5_000] {
        let (engine, player) = seeded_engine(&rt, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.to_async(&rt).iter(|| async {
                black_box(engine.balance(&player).await.unwrap());
            })
        });
    }

    group.finish();
}

// =============================================================================
// Write Path
// =============================================================================

fn bench_single_credit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("single_credit", |b| {
        b.to_async(&rt).iter(|| async {
            let engine = fresh_engine();
            let player = PlayerId::new("bench");
            engine
                .create_transaction(&player, Decimal::new(10_000, 2), TransactionKind::Credit, "")
                .await
                .unwrap();
        })
    });
}

fn bench_credit_then_rebuild(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    // Measures the full invalidate cycle: write, evict, miss, reload.
    c.bench_function("credit_then_rebuild", |b| {
        b.to_async(&rt).iter(|| async {
            let engine = fresh_engine();
            let player = PlayerId::new("bench");
            engine
                .create_transaction(&player, Decimal::new(10_000, 2), TransactionKind::Credit, "")
                .await
                .unwrap();
            black_box(engine.balance(&player).await.unwrap());
        })
    });
}

// =============================================================================
// Concurrency
// =============================================================================

fn bench_concurrent_players(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    const PLAYERS: usize = 8;
    const CREDITS_PER_PLAYER: usize = 25;

    let mut group = c.benchmark_group("concurrent_players");
    group.throughput(Throughput::Elements((PLAYERS * CREDITS_PER_PLAYER) as u64));

    group.bench_function("credits_across_players", |b| {
        b.to_async(&rt).iter(|| async {
            let engine = fresh_engine();

            let handles: Vec<_> = (0..PLAYERS)
                .map(|p| {
                    let engine = engine.clone();
                    tokio::spawn(async move {
                        let player = PlayerId::new(format!("player-{p}"));
                        for _ in 0..CREDITS_PER_PLAYER {
                            engine
                                .create_transaction(
                                    &player,
                                    Decimal::new(150, 2),
                                    TransactionKind::Credit,
                                    "",
                                )
                                .await
                                .unwrap();
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.await.unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cached_history_read,
    bench_balance_scaling,
    bench_single_credit,
    bench_credit_then_rebuild,
    bench_concurrent_players,
);
criterion_main!(benches);
