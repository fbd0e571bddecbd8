use sea_orm::{ConnectionTrait, prelude::*};

use crate::{EngineError, ResultEngine, Transaction, TransferLegs, legs, transactions};

use super::Engine;

mod create;
mod delete;
mod list;
mod transfer;
mod update;

pub use list::{SortOrder, TransactionListFilter, TransactionListItem};
pub use transfer::TransferCreated;

impl Engine {
    /// Returns a single transaction; transfer legs come with their direction.
    pub async fn transaction(&self, transaction_id: i32) -> ResultEngine<Transaction> {
        let model = self
            .require_transaction(&self.database, transaction_id)
            .await?;
        legs::resolve_rows(&self.database, vec![model])
            .await?
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }

    /// Both legs of a transfer group, outgoing first.
    pub async fn transfer_legs(&self, group_id: i32) -> ResultEngine<TransferLegs> {
        legs::load_transfer(&self.database, group_id).await
    }

    pub(super) async fn require_transaction<C: ConnectionTrait>(
        &self,
        db: &C,
        transaction_id: i32,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }
}
