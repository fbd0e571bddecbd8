//! The module contains the error the engine can throw.
//!
//! The errors fall in five families:
//!
//! - [`KeyNotFound`] when a wallet, category, transaction or transfer group
//!   does not exist.
//! - validation errors ([`InvalidAmount`], [`InvalidName`], [`InvalidDate`],
//!   [`InvalidTransfer`], [`CategoryMismatch`]) for input the ledger refuses.
//! - [`BrokenTransfer`] when a transfer group does not have exactly two legs.
//! - [`Corrupt`] when a stored value cannot be decoded.
//! - [`Database`] for anything surfaced by the store, including CHECK
//!   constraint failures.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`InvalidTransfer`]: EngineError::InvalidTransfer
//!  [`CategoryMismatch`]: EngineError::CategoryMismatch
//!  [`BrokenTransfer`]: EngineError::BrokenTransfer
//!  [`Corrupt`]: EngineError::Corrupt
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid transfer: {0}")]
    InvalidTransfer(String),
    #[error("Category mismatch: {0}")]
    CategoryMismatch(String),
    #[error("Broken transfer: {0}")]
    BrokenTransfer(String),
    #[error("Corrupt row: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Whether the error was caused by caller input rather than by the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidName(_)
                | Self::InvalidDate(_)
                | Self::InvalidTransfer(_)
                | Self::CategoryMismatch(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidTransfer(a), Self::InvalidTransfer(b)) => a == b,
            (Self::CategoryMismatch(a), Self::CategoryMismatch(b)) => a == b,
            (Self::BrokenTransfer(a), Self::BrokenTransfer(b)) => a == b,
            (Self::Corrupt(a), Self::Corrupt(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
