use chrono::Utc;

use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{
    Currency, EngineError, ResultEngine, Wallet, transactions, transfer_groups,
    util::normalize_required_name, wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return a wallet from DB.
    pub async fn wallet(&self, wallet_id: i32) -> ResultEngine<Wallet> {
        let model = self.require_wallet(&self.database, wallet_id).await?;
        Wallet::try_from(model)
    }

    /// All wallets, oldest first.
    pub async fn list_wallets(&self) -> ResultEngine<Vec<Wallet>> {
        wallets::Entity::find()
            .order_by_asc(wallets::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect()
    }

    /// Add a new wallet. The currency defaults to IDR.
    pub async fn new_wallet(&self, name: &str, currency: Option<Currency>) -> ResultEngine<Wallet> {
        let name = normalize_required_name(name, "wallet")?;
        let currency = currency.unwrap_or_default();
        let model = wallets::ActiveModel::new_wallet(name, &currency, Utc::now())
            .insert(&self.database)
            .await?;
        tracing::debug!(wallet_id = model.id, "wallet created");
        Wallet::try_from(model)
    }

    /// Renames an existing wallet.
    pub async fn rename_wallet(&self, wallet_id: i32, new_name: &str) -> ResultEngine<Wallet> {
        let new_name = normalize_required_name(new_name, "wallet")?;
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet_id).await?;
            let active = wallets::ActiveModel {
                id: ActiveValue::Set(wallet_id),
                name: ActiveValue::Set(new_name),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Wallet::try_from(model)
        })
    }

    /// Deletes a wallet with all its transactions.
    ///
    /// Transfers touching the wallet are removed whole: their groups are
    /// deleted first so the sibling leg in the other wallet goes too. The
    /// wallet's remaining rows follow through the FK cascade.
    pub async fn delete_wallet(&self, wallet_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet_id).await?;

            let group_ids: Vec<Option<i32>> = transactions::Entity::find()
                .select_only()
                .column(transactions::Column::TransferGroupId)
                .distinct()
                .filter(transactions::Column::WalletId.eq(wallet_id))
                .filter(transactions::Column::TransferGroupId.is_not_null())
                .into_tuple()
                .all(&db_tx)
                .await?;
            let group_ids: Vec<i32> = group_ids.into_iter().flatten().collect();

            if !group_ids.is_empty() {
                let swept = transfer_groups::Entity::delete_many()
                    .filter(transfer_groups::Column::Id.is_in(group_ids))
                    .exec(&db_tx)
                    .await?
                    .rows_affected;
                tracing::debug!(wallet_id, swept, "transfer groups removed with wallet");
            }

            wallets::Entity::delete_by_id(wallet_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    pub(super) async fn require_wallet<C: ConnectionTrait>(
        &self,
        db: &C,
        wallet_id: i32,
    ) -> ResultEngine<wallets::Model> {
        wallets::Entity::find_by_id(wallet_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
    }
}
