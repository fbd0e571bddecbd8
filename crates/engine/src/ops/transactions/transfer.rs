use chrono::Utc;
use serde::{Deserialize, Serialize};

use sea_orm::{ActiveModelTrait, ActiveValue, TransactionTrait};

use crate::{
    EngineError, LegRole, ResultEngine, Transaction, TransactionType, TransferCmd, transactions,
    transfer_groups,
    util::{ensure_positive_amount, normalize_optional_text},
};

use super::super::{Engine, with_tx};

/// Result of [`Engine::transfer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCreated {
    pub transfer_group_id: i32,
    pub outgoing: Transaction,
    pub incoming: Transaction,
}

impl Engine {
    /// Moves money between two wallets.
    ///
    /// Writes the group, then the outgoing row, then the incoming row, all in
    /// one DB transaction: the outgoing leg always gets the smaller id.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<TransferCreated> {
        if cmd.from_wallet_id == cmd.to_wallet_id {
            return Err(EngineError::InvalidTransfer(
                "from_wallet_id and to_wallet_id must differ".to_string(),
            ));
        }
        ensure_positive_amount(cmd.amount_minor)?;
        let TransferCmd {
            from_wallet_id,
            to_wallet_id,
            amount_minor,
            meta,
        } = cmd;
        let note = normalize_optional_text(meta.note.as_deref());
        let created_at = Utc::now();

        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, from_wallet_id).await?;
            self.require_wallet(&db_tx, to_wallet_id).await?;

            let group = transfer_groups::ActiveModel {
                id: ActiveValue::NotSet,
                note: ActiveValue::Set(note.clone()),
                created_at: ActiveValue::Set(created_at),
            }
            .insert(&db_tx)
            .await?;

            let leg = |wallet_id: i32| transactions::NewRow {
                wallet_id,
                category_id: None,
                kind: TransactionType::Transfer,
                amount_minor,
                note: note.clone(),
                occurred_at: meta.occurred_at,
                created_at,
                transfer_group_id: Some(group.id),
            };
            let outgoing = transactions::ActiveModel::from(leg(from_wallet_id))
                .insert(&db_tx)
                .await?;
            let incoming = transactions::ActiveModel::from(leg(to_wallet_id))
                .insert(&db_tx)
                .await?;

            tracing::debug!(
                transfer_group_id = group.id,
                outgoing_id = outgoing.id,
                incoming_id = incoming.id,
                "transfer created"
            );

            Ok(TransferCreated {
                transfer_group_id: group.id,
                outgoing: Transaction::from_model(outgoing, Some(LegRole::Outgoing))?,
                incoming: Transaction::from_model(incoming, Some(LegRole::Incoming))?,
            })
        })
    }
}
