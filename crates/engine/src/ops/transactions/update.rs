use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    EngineError, EntryKind, LegRole, ResultEngine, Transaction, TransactionType,
    UpdateTransactionCmd, legs, transactions, transfer_groups,
    util::{ensure_positive_amount, normalize_optional_text},
};

use super::super::{Engine, with_tx};

impl Engine {
    /// Patches an existing transaction.
    ///
    /// Income and expense rows are edited in place. For a transfer leg both
    /// rows of the group are rewritten together: amount, date and note are
    /// shared, the outgoing row moves to `from_wallet_id` and the incoming row
    /// to `to_wallet_id`. Returns the row addressed by `transaction_id`.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        if let Some(amount_minor) = cmd.amount_minor {
            ensure_positive_amount(amount_minor)?;
        }

        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, cmd.transaction_id)
                .await?;
            match model.transfer_group_id {
                Some(group_id) => self.update_transfer(&db_tx, model, group_id, &cmd).await,
                None => self.update_entry(&db_tx, model, &cmd).await,
            }
        })
    }

    async fn update_entry(
        &self,
        db_tx: &DatabaseTransaction,
        mut model: transactions::Model,
        cmd: &UpdateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        if cmd.touches_transfer_fields() {
            return Err(EngineError::InvalidTransfer(
                "from_wallet_id/to_wallet_id only apply to transfers".to_string(),
            ));
        }
        let kind = match TransactionType::try_from(model.kind.as_str())? {
            TransactionType::Expense => EntryKind::Expense,
            TransactionType::Income => EntryKind::Income,
            TransactionType::Transfer => {
                return Err(EngineError::BrokenTransfer(format!(
                    "transfer {} has no transfer group",
                    model.id
                )));
            }
        };

        if let Some(wallet_id) = cmd.wallet_id {
            self.require_wallet(db_tx, wallet_id).await?;
            model.wallet_id = wallet_id;
        }
        match cmd.category_id {
            Some(Some(category_id)) => {
                self.require_category_for(db_tx, category_id, kind).await?;
                model.category_id = Some(category_id);
            }
            Some(None) => model.category_id = None,
            None => {}
        }
        if let Some(amount_minor) = cmd.amount_minor {
            model.amount_minor = amount_minor;
        }
        if let Some(occurred_at) = cmd.occurred_at {
            model.occurred_at = occurred_at;
        }
        if let Some(note) = cmd.note.as_deref() {
            model.note = normalize_optional_text(Some(note));
        }

        let updated = model.into_full_update().update(db_tx).await?;
        Transaction::from_model(updated, None)
    }

    async fn update_transfer(
        &self,
        db_tx: &DatabaseTransaction,
        model: transactions::Model,
        group_id: i32,
        cmd: &UpdateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        if cmd.touches_entry_fields() {
            return Err(EngineError::InvalidTransfer(
                "wallet_id/category_id do not apply to transfers, use from_wallet_id/to_wallet_id"
                    .to_string(),
            ));
        }

        let rows = transactions::Entity::find()
            .filter(transactions::Column::TransferGroupId.eq(group_id))
            .all(db_tx)
            .await?;
        let (mut outgoing, mut incoming) = legs::split_pair(group_id, rows)?;

        let from_wallet_id = cmd.from_wallet_id.unwrap_or(outgoing.wallet_id);
        let to_wallet_id = cmd.to_wallet_id.unwrap_or(incoming.wallet_id);
        if from_wallet_id == to_wallet_id {
            return Err(EngineError::InvalidTransfer(
                "from_wallet_id and to_wallet_id must differ".to_string(),
            ));
        }
        if from_wallet_id != outgoing.wallet_id {
            self.require_wallet(db_tx, from_wallet_id).await?;
        }
        if to_wallet_id != incoming.wallet_id {
            self.require_wallet(db_tx, to_wallet_id).await?;
        }
        outgoing.wallet_id = from_wallet_id;
        incoming.wallet_id = to_wallet_id;

        let note = cmd
            .note
            .as_deref()
            .map(|note| normalize_optional_text(Some(note)));
        for leg in [&mut outgoing, &mut incoming] {
            if let Some(amount_minor) = cmd.amount_minor {
                leg.amount_minor = amount_minor;
            }
            if let Some(occurred_at) = cmd.occurred_at {
                leg.occurred_at = occurred_at;
            }
            if let Some(note) = &note {
                leg.note.clone_from(note);
            }
        }

        if let Some(note) = note {
            transfer_groups::ActiveModel {
                id: ActiveValue::Set(group_id),
                note: ActiveValue::Set(note),
                ..Default::default()
            }
            .update(db_tx)
            .await?;
        }

        let outgoing = outgoing.into_full_update().update(db_tx).await?;
        let incoming = incoming.into_full_update().update(db_tx).await?;
        tracing::debug!(group_id, "transfer legs updated");

        if model.id == outgoing.id {
            Transaction::from_model(outgoing, Some(LegRole::Outgoing))
        } else {
            Transaction::from_model(incoming, Some(LegRole::Incoming))
        }
    }
}
