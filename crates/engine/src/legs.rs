//! Transfer legs.
//!
//! A transfer is stored as two `transactions` rows sharing a transfer group.
//! No column says which row is the source: the row with the smaller id is the
//! **outgoing** leg (money leaves its wallet) and the other one is the
//! **incoming** leg. The ordering holds because the outgoing row is always
//! inserted first, inside the same DB transaction as its sibling.
//!
//! A group that does not have exactly two rows is a broken invariant and is
//! reported as [`EngineError::BrokenTransfer`], never guessed around.

use std::collections::HashMap;

use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, Transaction, transactions, transfer_groups};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegRole {
    Outgoing,
    Incoming,
}

impl LegRole {
    /// Role of the row `row_id` in a group whose smallest row id is `min_id`.
    pub(crate) fn of(row_id: i32, min_id: i32) -> Self {
        if row_id == min_id {
            Self::Outgoing
        } else {
            Self::Incoming
        }
    }
}

/// Both legs of one transfer, outgoing first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLegs {
    pub group_id: i32,
    pub note: Option<String>,
    pub outgoing: Transaction,
    pub incoming: Transaction,
}

fn broken(group_id: i32, reason: &str) -> EngineError {
    tracing::error!(group_id, reason, "transfer group invariant violated");
    EngineError::BrokenTransfer(format!("transfer group {group_id}: {reason}"))
}

/// Splits the rows of one group into `(outgoing, incoming)`.
///
/// Rows may come in any order; the smaller id wins the outgoing role.
pub(crate) fn split_pair(
    group_id: i32,
    mut rows: Vec<transactions::Model>,
) -> ResultEngine<(transactions::Model, transactions::Model)> {
    if rows.len() != 2 {
        return Err(broken(
            group_id,
            &format!("expected 2 legs, found {}", rows.len()),
        ));
    }
    rows.sort_by_key(|row| row.id);
    let mut rows = rows.into_iter();
    let (Some(outgoing), Some(incoming)) = (rows.next(), rows.next()) else {
        return Err(broken(group_id, "missing legs"));
    };
    if outgoing.wallet_id == incoming.wallet_id {
        return Err(broken(group_id, "both legs target the same wallet"));
    }
    Ok((outgoing, incoming))
}

/// Loads and resolves a transfer group.
pub(crate) async fn load_transfer<C: ConnectionTrait>(
    db: &C,
    group_id: i32,
) -> ResultEngine<TransferLegs> {
    let group = transfer_groups::Entity::find_by_id(group_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("transfer group not exists".to_string()))?;

    let rows = transactions::Entity::find()
        .filter(transactions::Column::TransferGroupId.eq(group_id))
        .order_by_asc(transactions::Column::Id)
        .all(db)
        .await?;

    let (outgoing, incoming) = split_pair(group_id, rows)?;
    Ok(TransferLegs {
        group_id,
        note: group.note,
        outgoing: Transaction::from_model(outgoing, Some(LegRole::Outgoing))?,
        incoming: Transaction::from_model(incoming, Some(LegRole::Incoming))?,
    })
}

/// Smallest row id for each of `group_ids`, checking that every group has two
/// legs. One grouped query for the whole set.
pub(crate) async fn outgoing_ids<C: ConnectionTrait>(
    db: &C,
    group_ids: &[i32],
) -> ResultEngine<HashMap<i32, i32>> {
    if group_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, i32, i64)> = transactions::Entity::find()
        .select_only()
        .column(transactions::Column::TransferGroupId)
        .column_as(transactions::Column::Id.min(), "min_id")
        .column_as(transactions::Column::Id.count(), "legs")
        .filter(transactions::Column::TransferGroupId.is_in(group_ids.iter().copied()))
        .group_by(transactions::Column::TransferGroupId)
        .into_tuple()
        .all(db)
        .await?;

    let mut out = HashMap::with_capacity(rows.len());
    for (group_id, min_id, legs) in rows {
        if legs != 2 {
            return Err(broken(group_id, &format!("expected 2 legs, found {legs}")));
        }
        out.insert(group_id, min_id);
    }
    Ok(out)
}

/// Converts rows to domain transactions, resolving transfer directions with a
/// single grouped query.
pub(crate) async fn resolve_rows<C: ConnectionTrait>(
    db: &C,
    rows: Vec<transactions::Model>,
) -> ResultEngine<Vec<Transaction>> {
    let mut group_ids: Vec<i32> = rows.iter().filter_map(|r| r.transfer_group_id).collect();
    group_ids.sort_unstable();
    group_ids.dedup();
    let min_ids = outgoing_ids(db, &group_ids).await?;

    rows.into_iter()
        .map(|row| {
            let role = match row.transfer_group_id {
                Some(group_id) => {
                    let min_id = min_ids
                        .get(&group_id)
                        .copied()
                        .ok_or_else(|| broken(group_id, "group has no legs"))?;
                    Some(LegRole::of(row.id, min_id))
                }
                None => None,
            };
            Transaction::from_model(row, role)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn leg(id: i32, wallet_id: i32) -> transactions::Model {
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        transactions::Model {
            id,
            wallet_id,
            category_id: None,
            kind: "transfer".to_string(),
            amount_minor: 500_000,
            note: None,
            occurred_at: at,
            created_at: at,
            transfer_group_id: Some(1),
        }
    }

    #[test]
    fn smaller_id_is_outgoing() {
        let (out, inc) = split_pair(1, vec![leg(8, 2), leg(7, 1)]).unwrap();
        assert_eq!(out.id, 7);
        assert_eq!(out.wallet_id, 1);
        assert_eq!(inc.id, 8);
        assert_eq!(inc.wallet_id, 2);
    }

    #[test]
    fn role_of_row() {
        assert_eq!(LegRole::of(7, 7), LegRole::Outgoing);
        assert_eq!(LegRole::of(8, 7), LegRole::Incoming);
    }

    #[test]
    fn single_leg_is_broken() {
        let err = split_pair(1, vec![leg(7, 1)]).unwrap_err();
        assert!(matches!(err, EngineError::BrokenTransfer(_)));
    }

    #[test]
    fn three_legs_are_broken() {
        let err = split_pair(1, vec![leg(7, 1), leg(8, 2), leg(9, 3)]).unwrap_err();
        assert!(matches!(err, EngineError::BrokenTransfer(_)));
    }

    #[test]
    fn same_wallet_legs_are_broken() {
        let err = split_pair(1, vec![leg(7, 1), leg(8, 1)]).unwrap_err();
        assert!(matches!(err, EngineError::BrokenTransfer(_)));
    }
}
