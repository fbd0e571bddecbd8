//! Income/expense summaries.
//!
//! Transfers move money between wallets without earning or spending it, so
//! every summary here skips rows that belong to a transfer group.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use sea_orm::{ConnectionTrait, QueryResult, Statement, TransactionTrait, Value};

use crate::{
    CategoryKind, EngineError, EntryKind, ResultEngine, TransactionType,
    util::{day_start, month_bounds, next_day_start},
};

use super::{Engine, with_tx};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub wallet_id: i32,
    pub income: i64,
    pub expense: i64,
    /// `income - expense`.
    pub net: i64,
    /// Sum of amounts with no category, income and expense alike.
    pub uncategorized: i64,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Total of one `(category, kind)` pair within a month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub category_kind: Option<CategoryKind>,
    pub kind: EntryKind,
    pub total: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: String,
    pub period: MonthPeriod,
    pub total_income: i64,
    pub total_expense: i64,
    pub net: i64,
    pub by_category: Vec<CategoryTotal>,
}

const SUMS: &str = "\
COALESCE(SUM(CASE WHEN t.kind = 'income' THEN t.amount_minor ELSE 0 END), 0) AS income, \
COALESCE(SUM(CASE WHEN t.kind = 'expense' THEN t.amount_minor ELSE 0 END), 0) AS expense, \
COALESCE(SUM(CASE WHEN t.id IS NOT NULL AND t.category_id IS NULL \
                  THEN t.amount_minor ELSE 0 END), 0) AS uncategorized";

fn summary_from_row(
    row: &QueryResult,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> ResultEngine<WalletSummary> {
    let income: i64 = row.try_get("", "income")?;
    let expense: i64 = row.try_get("", "expense")?;
    Ok(WalletSummary {
        wallet_id: row.try_get("", "wallet_id")?,
        income,
        expense,
        net: income - expense,
        uncategorized: row.try_get("", "uncategorized")?,
        from,
        to,
    })
}

impl Engine {
    /// Income, expense and uncategorized totals of one wallet.
    ///
    /// The optional range applies to the insertion time (`created_at`), from
    /// `from` at midnight up to and including midnight after `to`.
    pub async fn wallet_summary(
        &self,
        wallet_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ResultEngine<WalletSummary> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(EngineError::InvalidDate(
                "invalid range: from must be <= to".to_string(),
            ));
        }

        let mut sql = format!(
            "SELECT ? AS wallet_id, {SUMS} FROM transactions t \
             WHERE t.wallet_id = ? AND t.transfer_group_id IS NULL"
        );
        let mut values: Vec<Value> = vec![wallet_id.into(), wallet_id.into()];
        if let Some(from) = from {
            sql.push_str(" AND t.created_at >= ?");
            values.push(day_start(from).into());
        }
        if let Some(to) = to {
            sql.push_str(" AND t.created_at <= ?");
            values.push(next_day_start(to)?.into());
        }

        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet_id).await?;
            let stmt = Statement::from_sql_and_values(db_tx.get_database_backend(), sql, values);
            let row = db_tx
                .query_one(stmt)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
            summary_from_row(&row, from, to)
        })
    }

    /// [`Engine::wallet_summary`] for every wallet at once, without a range.
    ///
    /// One grouped query; wallets without entries report zeros.
    pub async fn wallet_summaries(&self) -> ResultEngine<Vec<WalletSummary>> {
        let stmt = Statement::from_string(
            self.database.get_database_backend(),
            format!(
                "SELECT w.id AS wallet_id, {SUMS} FROM wallets w \
                 LEFT JOIN transactions t \
                   ON t.wallet_id = w.id AND t.transfer_group_id IS NULL \
                 GROUP BY w.id ORDER BY w.id"
            ),
        );
        let rows = self.database.query_all(stmt).await?;
        rows.iter()
            .map(|row| summary_from_row(row, None, None))
            .collect()
    }

    /// Income and expense per category for a calendar month (`YYYY-MM`, UTC)
    /// of `occurred_at`.
    pub async fn monthly_summary(&self, month: &str) -> ResultEngine<MonthlySummary> {
        let (start, end) = month_bounds(month)?;

        let stmt = Statement::from_sql_and_values(
            self.database.get_database_backend(),
            "SELECT t.category_id AS category_id, c.name AS category_name, \
                    c.kind AS category_kind, t.kind AS kind, \
                    COALESCE(SUM(t.amount_minor), 0) AS total \
             FROM transactions t \
             LEFT JOIN categories c ON c.id = t.category_id \
             WHERE t.occurred_at >= ? AND t.occurred_at <= ? \
               AND t.kind IN ('income', 'expense') \
             GROUP BY t.category_id, c.name, c.kind, t.kind \
             ORDER BY t.kind, c.name, t.category_id",
            vec![start.into(), end.into()],
        );
        let rows = self.database.query_all(stmt).await?;

        let mut by_category = Vec::with_capacity(rows.len());
        let (mut total_income, mut total_expense) = (0_i64, 0_i64);
        for row in rows {
            let kind: String = row.try_get("", "kind")?;
            let kind = match TransactionType::try_from(kind.as_str())? {
                TransactionType::Income => EntryKind::Income,
                TransactionType::Expense => EntryKind::Expense,
                TransactionType::Transfer => continue,
            };
            let category_kind: Option<String> = row.try_get("", "category_kind")?;
            let total: i64 = row.try_get("", "total")?;
            match kind {
                EntryKind::Income => total_income += total,
                EntryKind::Expense => total_expense += total,
            }
            by_category.push(CategoryTotal {
                category_id: row.try_get("", "category_id")?,
                category_name: row.try_get("", "category_name")?,
                category_kind: category_kind
                    .as_deref()
                    .map(CategoryKind::try_from)
                    .transpose()?,
                kind,
                total,
            });
        }

        Ok(MonthlySummary {
            month: month.to_string(),
            period: MonthPeriod { start, end },
            total_income,
            total_expense,
            net: total_income - total_expense,
            by_category,
        })
    }
}
