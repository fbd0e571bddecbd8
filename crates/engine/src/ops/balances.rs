use serde::{Deserialize, Serialize};

use sea_orm::{ConnectionTrait, DatabaseTransaction, Statement, TransactionTrait, Value};

use crate::{Currency, EngineError, ResultEngine};

use super::{Engine, with_tx};

/// Balance of one wallet, derived from its rows at query time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub wallet_id: i32,
    pub wallet_name: String,
    pub currency: Currency,
    pub balance: i64,
}

// Income adds, expense subtracts. A transfer row subtracts when it is the
// smallest id of its group and adds otherwise.
const BALANCES_SQL: &str = "\
SELECT w.id AS wallet_id, w.name AS wallet_name, w.currency AS currency, \
       COALESCE(SUM(CASE \
           WHEN t.id IS NULL THEN 0 \
           WHEN t.kind = 'income' THEN t.amount_minor \
           WHEN t.kind = 'expense' THEN -t.amount_minor \
           WHEN t.kind = 'transfer' AND t.id = g.min_id THEN -t.amount_minor \
           WHEN t.kind = 'transfer' THEN t.amount_minor \
           ELSE 0 END), 0) AS balance \
FROM wallets w \
LEFT JOIN transactions t ON t.wallet_id = w.id \
LEFT JOIN (SELECT transfer_group_id, MIN(id) AS min_id \
           FROM transactions \
           WHERE transfer_group_id IS NOT NULL \
           GROUP BY transfer_group_id) g ON g.transfer_group_id = t.transfer_group_id";

const BALANCES_TAIL: &str = "GROUP BY w.id, w.name, w.currency ORDER BY w.id";

const BROKEN_GROUPS_SQL: &str = "\
SELECT transfer_group_id AS group_id, COUNT(*) AS legs \
FROM transactions \
WHERE transfer_group_id IN (SELECT transfer_group_id FROM transactions \
                            WHERE transfer_group_id IS NOT NULL";

impl Engine {
    /// Balances of all wallets, or of `wallet_id` only, ordered by wallet id.
    ///
    /// Fails with `BrokenTransfer` when a transfer touching the wallets in
    /// scope does not have exactly two legs in two distinct wallets.
    pub async fn balances(&self, wallet_id: Option<i32>) -> ResultEngine<Vec<WalletBalance>> {
        with_tx!(self, |db_tx| {
            if let Some(wallet_id) = wallet_id {
                self.require_wallet(&db_tx, wallet_id).await?;
            }
            ensure_transfers_intact(&db_tx, wallet_id).await?;

            let backend = db_tx.get_database_backend();
            let stmt = match wallet_id {
                Some(wallet_id) => Statement::from_sql_and_values(
                    backend,
                    format!("{BALANCES_SQL} WHERE w.id = ? {BALANCES_TAIL}"),
                    vec![wallet_id.into()],
                ),
                None => Statement::from_string(
                    backend,
                    format!("{BALANCES_SQL} {BALANCES_TAIL}"),
                ),
            };
            let rows = db_tx.query_all(stmt).await?;

            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                let currency: String = row.try_get("", "currency")?;
                out.push(WalletBalance {
                    wallet_id: row.try_get("", "wallet_id")?,
                    wallet_name: row.try_get("", "wallet_name")?,
                    currency: Currency::from_stored(&currency)?,
                    balance: row.try_get("", "balance")?,
                });
            }
            Ok(out)
        })
    }

    /// Balance of a single wallet.
    pub async fn wallet_balance(&self, wallet_id: i32) -> ResultEngine<WalletBalance> {
        self.balances(Some(wallet_id))
            .await?
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))
    }
}

async fn ensure_transfers_intact(
    db_tx: &DatabaseTransaction,
    wallet_id: Option<i32>,
) -> ResultEngine<()> {
    let (scope, values): (&str, Vec<Value>) = match wallet_id {
        Some(wallet_id) => (" AND wallet_id = ?", vec![wallet_id.into()]),
        None => ("", Vec::new()),
    };
    let stmt = Statement::from_sql_and_values(
        db_tx.get_database_backend(),
        format!(
            "{BROKEN_GROUPS_SQL}{scope}) \
             GROUP BY transfer_group_id \
             HAVING COUNT(*) <> 2 OR COUNT(DISTINCT wallet_id) <> 2 \
             LIMIT 1"
        ),
        values,
    );
    if let Some(row) = db_tx.query_one(stmt).await? {
        let group_id: i32 = row.try_get("", "group_id")?;
        let legs: i64 = row.try_get("", "legs")?;
        tracing::error!(group_id, legs, "transfer group invariant violated");
        return Err(EngineError::BrokenTransfer(format!(
            "transfer group {group_id}: expected 2 legs in distinct wallets, found {legs} legs"
        )));
    }
    Ok(())
}
