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

//! Error types for wallet operations.
//!
//! The taxonomy separates caller mistakes ([`WalletError::InvalidAmount`],
//! [`WalletError::UnknownKind`]) from business rejections
//! ([`WalletError::InsufficientFunds`]) and from persistence faults
//! ([`WalletError::Store`]), so callers branch on the variant rather than
//! inspecting message text.

use thiserror::Error;

/// Wallet operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Transaction kind string is not `credit` or `debit`
    #[error("unknown transaction kind '{0}' (use 'credit' or 'debit')")]
    UnknownKind(String),

    /// Debit exceeds the computed balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Ledger store failure, propagated unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure reported by a [`LedgerStore`](crate::LedgerStore) implementation.
///
/// Carries only a description; the engine never retries and never inspects
/// the reason. The cache for the affected player is left untouched when an
/// append fails with this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ledger store failure: {reason}")]
pub struct StoreError {
    reason: String,
}

impl StoreError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
