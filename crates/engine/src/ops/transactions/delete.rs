use sea_orm::{EntityTrait, TransactionTrait};

use crate::{ResultEngine, transactions, transfer_groups};

use super::super::{Engine, with_tx};

impl Engine {
    /// Hard-deletes a transaction.
    ///
    /// For a transfer leg the whole group goes, taking both legs with it.
    pub async fn delete_transaction(&self, transaction_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_transaction(&db_tx, transaction_id).await?;
            match model.transfer_group_id {
                Some(group_id) => {
                    transfer_groups::Entity::delete_by_id(group_id)
                        .exec(&db_tx)
                        .await?;
                    tracing::debug!(transaction_id, group_id, "transfer deleted");
                }
                None => {
                    transactions::Entity::delete_by_id(transaction_id)
                        .exec(&db_tx)
                        .await?;
                }
            }
            Ok(())
        })
    }
}
