use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sea_orm::{Condition, JoinType, QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{
    CategoryKind, EngineError, LegRole, ResultEngine, Transaction, TransactionType, categories,
    legs, transactions,
    util::{day_end, day_start},
    wallets,
};

use super::super::Engine;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Latest `occurred_at` first.
    #[default]
    Newest,
    Oldest,
    /// Largest amount first.
    Highest,
    Lowest,
}

/// Filters for listing transactions.
///
/// `date_from` and `date_to` are whole UTC days, both inclusive. `search`
/// matches wallet name, category name or note, ignoring case.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub kind: Option<TransactionType>,
    pub wallet_id: Option<i32>,
    pub category_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub sort: SortOrder,
}

/// A listed transaction with the names needed to display it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionListItem {
    pub transaction: Transaction,
    pub wallet_name: String,
    pub category_name: Option<String>,
    pub category_kind: Option<CategoryKind>,
}

impl TransactionListItem {
    pub fn transfer_direction(&self) -> Option<LegRole> {
        self.transaction.leg_role()
    }
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to)
        && from > to
    {
        return Err(EngineError::InvalidDate(
            "invalid range: date_from must be <= date_to".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(wallet_id) = filter.wallet_id {
            self = self.filter(transactions::Column::WalletId.eq(wallet_id));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(from) = filter.date_from {
            self = self.filter(transactions::Column::OccurredAt.gte(day_start(from)));
        }
        if let Some(to) = filter.date_to {
            self = self.filter(transactions::Column::OccurredAt.lte(day_end(to)));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            self = self.filter(
                Condition::any()
                    .add(wallets::Column::Name.contains(search))
                    .add(categories::Column::Name.contains(search))
                    .add(transactions::Column::Note.contains(search)),
            );
        }
        self
    }
}

impl Engine {
    /// Lists transactions matching `filter`.
    ///
    /// Ties in the chosen order are broken by id, newest first. Transfer
    /// directions are resolved for the whole page with one grouped query.
    pub async fn list_transactions(
        &self,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<TransactionListItem>> {
        validate_list_filter(filter)?;

        let mut query = transactions::Entity::find()
            .find_also_related(wallets::Entity)
            .join(JoinType::LeftJoin, transactions::Relation::Categories.def())
            .select_also(categories::Entity)
            .apply_tx_filters(filter);
        query = match filter.sort {
            SortOrder::Newest => query.order_by_desc(transactions::Column::OccurredAt),
            SortOrder::Oldest => query.order_by_asc(transactions::Column::OccurredAt),
            SortOrder::Highest => query.order_by_desc(transactions::Column::AmountMinor),
            SortOrder::Lowest => query.order_by_asc(transactions::Column::AmountMinor),
        };
        let rows = query
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut models = Vec::with_capacity(rows.len());
        let mut names = Vec::with_capacity(rows.len());
        for (model, wallet, category) in rows {
            let wallet = wallet.ok_or_else(|| {
                EngineError::Corrupt(format!("transaction {} has no wallet", model.id))
            })?;
            let category = category
                .map(|c| CategoryKind::try_from(c.kind.as_str()).map(|kind| (c.name, kind)))
                .transpose()?;
            models.push(model);
            names.push((wallet.name, category));
        }

        let transactions = legs::resolve_rows(&self.database, models).await?;

        Ok(transactions
            .into_iter()
            .zip(names)
            .map(|(transaction, (wallet_name, category))| {
                let (category_name, category_kind) = category
                    .map_or((None, None), |(name, kind)| (Some(name), Some(kind)));
                TransactionListItem {
                    transaction,
                    wallet_name,
                    category_name,
                    category_kind,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_newest() {
        assert_eq!(SortOrder::default(), SortOrder::Newest);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let filter = TransactionListFilter {
            date_from: NaiveDate::from_ymd_opt(2024, 2, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert!(matches!(
            validate_list_filter(&filter),
            Err(EngineError::InvalidDate(_))
        ));
    }
}
