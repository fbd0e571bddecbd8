//! Ledger engine for the Dompet finance tracker.
//!
//! The engine owns the persistent model (wallets, categories, transfer groups
//! and transactions) and the rules that keep it consistent:
//!
//! - income/expense rows are stored with a strictly positive amount; the sign
//!   is derived from the kind.
//! - a transfer is two rows sharing a transfer group, created, updated and
//!   deleted atomically. The row with the smaller id is the outgoing leg.
//! - balances and summaries are recomputed from rows with set-based queries
//!   on every call.

pub use categories::{Category, CategoryKind};
pub use commands::{EntryCmd, TransferCmd, TxMeta, UpdateTransactionCmd};
pub use currency::Currency;
pub use error::EngineError;
pub use legs::{LegRole, TransferLegs};
pub use ops::{
    Engine, EngineBuilder, MonthlySummary, SortOrder, TransactionListFilter, TransactionListItem,
    TransferCreated, WalletBalance, WalletSummary,
};
pub use ops::{CategoryTotal, MonthPeriod};
pub use transactions::{EntryKind, Transaction, TransactionKind, TransactionType};
pub use wallets::Wallet;

mod categories;
mod commands;
mod currency;
mod error;
mod legs;
mod ops;
mod transactions;
mod transfer_groups;
mod util;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
