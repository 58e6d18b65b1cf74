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

//! The ledger record and its direction.
//!
//! A [`Transaction`] is immutable once created: the ledger is append-only,
//! and balance is always derived by summing records, never stored.

use crate::WalletError;
use crate::base::{PlayerId, TransactionId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a transaction. The amount itself is always positive;
/// a credit raises the balance, a debit lowers it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl FromStr for TransactionKind {
    type Err = WalletError;

    /// Parses a kind case-insensitively, so `"Credit"`, `"CREDIT"` and
    /// `"credit"` are all accepted.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_lowercase().as_str() {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            _ => Err(WalletError::UnknownKind(raw.to_string())),
        }
    }
}

/// A single entry in a player's ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub player_id: PlayerId,
    /// Strictly positive; direction lives in `kind`, not in the sign.
    pub amount: Decimal,
    pub kind: TransactionKind,
    /// Caller-supplied tag (idempotency key, promo code, ...). Opaque to the
    /// engine and not checked for uniqueness.
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a new record with a fresh id and the current timestamp.
    ///
    /// The engine calls this under the per-player write lock, which is what
    /// keeps `created_at` non-decreasing in insertion order for a player.
    pub fn new(
        player_id: PlayerId,
        amount: Decimal,
        kind: TransactionKind,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            player_id,
            amount,
            kind,
            reference: reference.into(),
            created_at: Utc::now(),
        }
    }

    /// The amount with direction applied: positive for credits, negative
    /// for debits. Balance is the sum of these.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Credit => self.amount,
            TransactionKind::Debit => -self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("credit".parse::<TransactionKind>().unwrap(), TransactionKind::Credit);
        assert_eq!("Credit".parse::<TransactionKind>().unwrap(), TransactionKind::Credit);
        assert_eq!("DEBIT".parse::<TransactionKind>().unwrap(), TransactionKind::Debit);
    }

    #[test]
    fn unknown_kind_is_rejected_with_the_raw_input() {
        let result = "refund".parse::<TransactionKind>();
        assert_eq!(result, Err(WalletError::UnknownKind("refund".to_string())));
    }

    #[test]
    fn signed_amount_follows_kind() {
        let credit = Transaction::new(PlayerId::new("p1"), dec!(12.67), TransactionKind::Credit, "x");
        let debit = Transaction::new(PlayerId::new("p1"), dec!(30.46), TransactionKind::Debit, "x");
        assert_eq!(credit.signed_amount(), dec!(12.67));
        assert_eq!(debit.signed_amount(), dec!(-30.46));
    }
}
