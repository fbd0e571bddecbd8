//! Transaction primitives.
//!
//! A stored row has one of three types (`expense`, `income`, `transfer`). At
//! the domain level a transfer row is a [`TransactionKind::TransferLeg`] whose
//! role is resolved from the rows of its group (see [`crate::legs`]) rather
//! than read from a column.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{CategoryKind, EngineError, LegRole, ResultEngine};

/// Row type as persisted in `transactions.kind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Transfer => "transfer",
        }
    }
}

impl TryFrom<&str> for TransactionType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            "transfer" => Ok(Self::Transfer),
            other => Err(EngineError::Corrupt(format!(
                "unknown transaction type: {other}"
            ))),
        }
    }
}

/// The two single-row kinds: everything that is not a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub fn transaction_type(self) -> TransactionType {
        match self {
            Self::Expense => TransactionType::Expense,
            Self::Income => TransactionType::Income,
        }
    }

    /// The category kind a category must have to label this entry.
    pub fn category_kind(self) -> CategoryKind {
        match self {
            Self::Expense => CategoryKind::Expense,
            Self::Income => CategoryKind::Income,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionKind {
    Expense,
    Income,
    TransferLeg { group_id: i32, role: LegRole },
}

impl TransactionKind {
    pub fn transaction_type(self) -> TransactionType {
        match self {
            Self::Expense => TransactionType::Expense,
            Self::Income => TransactionType::Income,
            Self::TransferLeg { .. } => TransactionType::Transfer,
        }
    }
}

impl From<EntryKind> for TransactionKind {
    fn from(value: EntryKind) -> Self {
        match value {
            EntryKind::Expense => Self::Expense,
            EntryKind::Income => Self::Income,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i32,
    pub wallet_id: i32,
    pub category_id: Option<i32>,
    pub kind: TransactionKind,
    /// Always > 0; the sign comes from `kind`.
    pub amount_minor: i64,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn transfer_group_id(&self) -> Option<i32> {
        match self.kind {
            TransactionKind::TransferLeg { group_id, .. } => Some(group_id),
            _ => None,
        }
    }

    pub fn leg_role(&self) -> Option<LegRole> {
        match self.kind {
            TransactionKind::TransferLeg { role, .. } => Some(role),
            _ => None,
        }
    }

    /// Builds the domain row from storage.
    ///
    /// `role` must be provided for transfer rows (resolved by the caller from
    /// the group) and is ignored otherwise.
    pub(crate) fn from_model(model: Model, role: Option<LegRole>) -> ResultEngine<Self> {
        let kind = match TransactionType::try_from(model.kind.as_str())? {
            TransactionType::Expense | TransactionType::Income
                if model.transfer_group_id.is_some() =>
            {
                return Err(EngineError::BrokenTransfer(format!(
                    "transaction {} is not a transfer but belongs to a transfer group",
                    model.id
                )));
            }
            TransactionType::Expense => TransactionKind::Expense,
            TransactionType::Income => TransactionKind::Income,
            TransactionType::Transfer => {
                let group_id = model.transfer_group_id.ok_or_else(|| {
                    EngineError::BrokenTransfer(format!(
                        "transfer {} has no transfer group",
                        model.id
                    ))
                })?;
                let role = role.ok_or_else(|| {
                    EngineError::BrokenTransfer(format!(
                        "direction of transfer {} is unresolved",
                        model.id
                    ))
                })?;
                TransactionKind::TransferLeg { group_id, role }
            }
        };

        Ok(Self {
            id: model.id,
            wallet_id: model.wallet_id,
            category_id: model.category_id,
            kind,
            amount_minor: model.amount_minor,
            note: model.note,
            occurred_at: model.occurred_at,
            created_at: model.created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub wallet_id: i32,
    pub category_id: Option<i32>,
    pub kind: String,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub transfer_group_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Wallets,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::transfer_groups::Entity",
        from = "Column::TransferGroupId",
        to = "super::transfer_groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TransferGroups,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::transfer_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransferGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert payload for one row; `id` is assigned by the store.
pub(crate) struct NewRow {
    pub(crate) wallet_id: i32,
    pub(crate) category_id: Option<i32>,
    pub(crate) kind: TransactionType,
    pub(crate) amount_minor: i64,
    pub(crate) note: Option<String>,
    pub(crate) occurred_at: DateTime<Utc>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) transfer_group_id: Option<i32>,
}

impl From<NewRow> for ActiveModel {
    fn from(row: NewRow) -> Self {
        Self {
            id: ActiveValue::NotSet,
            wallet_id: ActiveValue::Set(row.wallet_id),
            category_id: ActiveValue::Set(row.category_id),
            kind: ActiveValue::Set(row.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(row.amount_minor),
            note: ActiveValue::Set(row.note),
            occurred_at: ActiveValue::Set(row.occurred_at),
            created_at: ActiveValue::Set(row.created_at),
            transfer_group_id: ActiveValue::Set(row.transfer_group_id),
        }
    }
}

impl Model {
    /// Active model with every column set, so an update rewrites the row.
    pub(crate) fn into_full_update(self) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id),
            wallet_id: ActiveValue::Set(self.wallet_id),
            category_id: ActiveValue::Set(self.category_id),
            kind: ActiveValue::Set(self.kind),
            amount_minor: ActiveValue::Set(self.amount_minor),
            note: ActiveValue::Set(self.note),
            occurred_at: ActiveValue::Set(self.occurred_at),
            created_at: ActiveValue::Set(self.created_at),
            transfer_group_id: ActiveValue::Set(self.transfer_group_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn model(kind: &str, transfer_group_id: Option<i32>) -> Model {
        let at = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        Model {
            id: 7,
            wallet_id: 1,
            category_id: None,
            kind: kind.to_string(),
            amount_minor: 500_000,
            note: None,
            occurred_at: at,
            created_at: at,
            transfer_group_id,
        }
    }

    #[test]
    fn transfer_row_carries_group_and_role() {
        let entry = Transaction::from_model(model("income", None), None).unwrap();
        assert_eq!(entry.kind, TransactionKind::Income);
        assert_eq!(entry.transfer_group_id(), None);
        assert_eq!(entry.leg_role(), None);

        let out = Transaction::from_model(model("transfer", Some(3)), Some(LegRole::Outgoing))
            .unwrap();
        assert_eq!(out.transfer_group_id(), Some(3));
        assert_eq!(out.leg_role(), Some(LegRole::Outgoing));
    }

    #[test]
    fn unknown_stored_type_is_corrupt() {
        let err = Transaction::from_model(model("refund", None), None).unwrap_err();
        assert!(matches!(err, EngineError::Corrupt(_)));
    }

    #[test]
    fn transfer_without_role_is_rejected() {
        let err = Transaction::from_model(model("transfer", Some(3)), None).unwrap_err();
        assert!(matches!(err, EngineError::BrokenTransfer(_)));
    }

    #[test]
    fn entry_with_group_is_rejected() {
        let err = Transaction::from_model(model("expense", Some(3)), None).unwrap_err();
        assert!(matches!(err, EngineError::BrokenTransfer(_)));
    }

    #[test]
    fn entry_kind_maps_to_category_kind() {
        assert_eq!(EntryKind::Income.category_kind(), CategoryKind::Income);
        assert_eq!(EntryKind::Expense.category_kind(), CategoryKind::Expense);
    }
}
