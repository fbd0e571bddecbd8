//! Command structs for engine operations.
//!
//! These types group parameters for the write operations on transactions
//! (entry/transfer/update), keeping call sites readable and avoiding long
//! argument lists.

use chrono::{DateTime, Utc};

use crate::EntryKind;

/// Common metadata for transaction creation.
#[derive(Clone, Debug)]
pub struct TxMeta {
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl TxMeta {
    #[must_use]
    pub fn new(occurred_at: DateTime<Utc>) -> Self {
        Self {
            note: None,
            occurred_at,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Create an income or expense transaction.
#[derive(Clone, Debug)]
pub struct EntryCmd {
    pub kind: EntryKind,
    pub wallet_id: i32,
    pub category_id: Option<i32>,
    pub amount_minor: i64,
    pub meta: TxMeta,
}

impl EntryCmd {
    #[must_use]
    pub fn new(
        kind: EntryKind,
        wallet_id: i32,
        amount_minor: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            wallet_id,
            category_id: None,
            amount_minor,
            meta: TxMeta::new(occurred_at),
        }
    }

    #[must_use]
    pub fn income(wallet_id: i32, amount_minor: i64, occurred_at: DateTime<Utc>) -> Self {
        Self::new(EntryKind::Income, wallet_id, amount_minor, occurred_at)
    }

    #[must_use]
    pub fn expense(wallet_id: i32, amount_minor: i64, occurred_at: DateTime<Utc>) -> Self {
        Self::new(EntryKind::Expense, wallet_id, amount_minor, occurred_at)
    }

    #[must_use]
    pub fn category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.meta.note = Some(note.into());
        self
    }
}

/// Move money from one wallet to another.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub from_wallet_id: i32,
    pub to_wallet_id: i32,
    pub amount_minor: i64,
    pub meta: TxMeta,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        from_wallet_id: i32,
        to_wallet_id: i32,
        amount_minor: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            from_wallet_id,
            to_wallet_id,
            amount_minor,
            meta: TxMeta::new(occurred_at),
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.meta.note = Some(note.into());
        self
    }
}

/// Patch an existing transaction.
///
/// `None` leaves a field unchanged. An empty `note` clears it and
/// `category_id: Some(None)` removes the category. Which fields apply depends
/// on the stored kind: `wallet_id`/`category_id` for income and expense,
/// `from_wallet_id`/`to_wallet_id` for a transfer leg.
#[derive(Clone, Debug, Default)]
pub struct UpdateTransactionCmd {
    pub transaction_id: i32,

    pub amount_minor: Option<i64>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub note: Option<String>,

    // Income/Expense.
    pub wallet_id: Option<i32>,
    pub category_id: Option<Option<i32>>,

    // Transfer.
    pub from_wallet_id: Option<i32>,
    pub to_wallet_id: Option<i32>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(transaction_id: i32) -> Self {
        Self {
            transaction_id,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn wallet_id(mut self, wallet_id: i32) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Option<i32>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn from_wallet_id(mut self, wallet_id: i32) -> Self {
        self.from_wallet_id = Some(wallet_id);
        self
    }

    #[must_use]
    pub fn to_wallet_id(mut self, wallet_id: i32) -> Self {
        self.to_wallet_id = Some(wallet_id);
        self
    }

    pub(crate) fn touches_entry_fields(&self) -> bool {
        self.wallet_id.is_some() || self.category_id.is_some()
    }

    pub(crate) fn touches_transfer_fields(&self) -> bool {
        self.from_wallet_id.is_some() || self.to_wallet_id.is_some()
    }
}
