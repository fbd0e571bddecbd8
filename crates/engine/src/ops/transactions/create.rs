use chrono::Utc;

use sea_orm::{ActiveModelTrait, TransactionTrait};

use crate::{
    EntryCmd, ResultEngine, Transaction, transactions,
    util::{ensure_positive_amount, normalize_optional_text},
};

use super::super::{Engine, with_tx};

impl Engine {
    /// Records an income or an expense.
    ///
    /// The wallet must exist. A category, when given, must exist and have the
    /// same kind as the entry.
    pub async fn create_entry(&self, cmd: EntryCmd) -> ResultEngine<Transaction> {
        ensure_positive_amount(cmd.amount_minor)?;
        let EntryCmd {
            kind,
            wallet_id,
            category_id,
            amount_minor,
            meta,
        } = cmd;
        let note = normalize_optional_text(meta.note.as_deref());

        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet_id).await?;
            if let Some(category_id) = category_id {
                self.require_category_for(&db_tx, category_id, kind).await?;
            }

            let row = transactions::NewRow {
                wallet_id,
                category_id,
                kind: kind.transaction_type(),
                amount_minor,
                note,
                occurred_at: meta.occurred_at,
                created_at: Utc::now(),
                transfer_group_id: None,
            };
            let model = transactions::ActiveModel::from(row).insert(&db_tx).await?;
            tracing::debug!(transaction_id = model.id, kind = kind.transaction_type().as_str(), "entry created");
            Transaction::from_model(model, None)
        })
    }
}
