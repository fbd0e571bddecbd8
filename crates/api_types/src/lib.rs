//! Wire contracts of the HTTP API.
//!
//! Request bodies and query strings use `snake_case` field names, responses
//! use `camelCase`. Amounts are integers in the smallest currency unit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// `occurred_at` as typed by users: `YYYY-MM-DD HH:mm`, read as UTC.
pub mod occurred_at {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn parse(value: &str) -> Result<DateTime<Utc>, String> {
        NaiveDateTime::parse_from_str(value.trim(), FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| format!("invalid occurred_at, expected YYYY-MM-DD HH:mm: {value}"))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(D::Error::custom))
                .transpose()
        }
    }
}

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        /// ISO 4217 code; IDR when absent.
        pub currency: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletRename {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletView {
        pub id: i32,
        pub name: String,
        pub currency: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WalletSummaryQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletSummaryView {
        pub wallet_id: i32,
        pub income: i64,
        pub expense: i64,
        pub net: i64,
        pub uncategorized: i64,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub from: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub to: Option<NaiveDate>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryType {
        Expense,
        Income,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryType,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryList {
        #[serde(rename = "type")]
        pub kind: Option<CategoryType>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub id: i32,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryType,
        pub created_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;
    use crate::category::CategoryType;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionType {
        Expense,
        Income,
        Transfer,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum TransferDirection {
        #[serde(rename = "out")]
        Out,
        #[serde(rename = "in")]
        In,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SortOrder {
        #[default]
        Newest,
        Oldest,
        Highest,
        Lowest,
    }

    /// Body of an income or expense creation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryNew {
        pub wallet_id: i32,
        #[serde(default)]
        pub category_id: Option<i32>,
        pub amount: i64,
        #[serde(with = "crate::occurred_at")]
        pub occurred_at: DateTime<Utc>,
        #[serde(default)]
        pub note: Option<String>,
    }

    /// Body of a transfer creation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_wallet_id: i32,
        pub to_wallet_id: i32,
        pub amount: i64,
        #[serde(with = "crate::occurred_at")]
        pub occurred_at: DateTime<Utc>,
        #[serde(default)]
        pub note: Option<String>,
    }

    /// `POST /transactions`, discriminated by `type`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum TransactionNew {
        Expense(EntryNew),
        Income(EntryNew),
        Transfer(TransferNew),
    }

    impl TransactionNew {
        /// Shape checks done before the request reaches the ledger.
        pub fn validate(&self) -> Result<(), String> {
            let amount = match self {
                Self::Expense(entry) | Self::Income(entry) => entry.amount,
                Self::Transfer(transfer) => {
                    if transfer.from_wallet_id == transfer.to_wallet_id {
                        return Err("from_wallet_id and to_wallet_id must differ".to_string());
                    }
                    transfer.amount
                }
            };
            if amount <= 0 {
                return Err("amount must be a positive integer".to_string());
            }
            Ok(())
        }
    }

    /// `PATCH /transactions/:id`. Absent fields stay unchanged.
    ///
    /// `wallet_id`/`category_id` apply to income and expense,
    /// `from_wallet_id`/`to_wallet_id` to transfers. `category_id: null`
    /// removes the category; an empty `note` clears it.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(default)]
        pub wallet_id: Option<i32>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub category_id: Option<Option<i32>>,
        #[serde(default)]
        pub from_wallet_id: Option<i32>,
        #[serde(default)]
        pub to_wallet_id: Option<i32>,
        #[serde(default)]
        pub amount: Option<i64>,
        #[serde(default, with = "crate::occurred_at::option")]
        pub occurred_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub note: Option<String>,
    }

    impl TransactionUpdate {
        pub fn validate(&self) -> Result<(), String> {
            if self.amount.is_some_and(|amount| amount <= 0) {
                return Err("amount must be a positive integer".to_string());
            }
            if let (Some(from), Some(to)) = (self.from_wallet_id, self.to_wallet_id)
                && from == to
            {
                return Err("from_wallet_id and to_wallet_id must differ".to_string());
            }
            Ok(())
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        #[serde(rename = "type")]
        pub kind: Option<TransactionType>,
        pub wallet_id: Option<i32>,
        pub category_id: Option<i32>,
        pub date_from: Option<NaiveDate>,
        pub date_to: Option<NaiveDate>,
        pub search: Option<String>,
        pub sort: Option<SortOrder>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: i32,
        pub wallet_id: i32,
        pub category_id: Option<i32>,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub amount: i64,
        pub note: Option<String>,
        pub occurred_at: DateTime<Utc>,
        pub created_at: DateTime<Utc>,
        pub transfer_group_id: Option<i32>,
        pub transfer_direction: Option<TransferDirection>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListItem {
        #[serde(flatten)]
        pub transaction: TransactionView,
        pub wallet_name: String,
        pub category_name: Option<String>,
        pub category_type: Option<CategoryType>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferCreated {
        pub transfer_group_id: i32,
        pub outgoing: TransactionView,
        pub incoming: TransactionView,
    }

    /// One row of `GET /transfer-groups/:id`, outgoing first.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferLegView {
        pub id: i32,
        pub wallet_id: i32,
        pub amount: i64,
        pub note: Option<String>,
        pub occurred_at: DateTime<Utc>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BalanceQuery {
        pub wallet_id: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BalanceView {
        pub wallet_id: i32,
        pub wallet_name: String,
        pub currency: String,
        pub balance: i64,
    }
}

pub mod report {
    use super::*;
    use crate::{category::CategoryType, transaction::TransactionType};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummaryQuery {
        /// `YYYY-MM`.
        pub month: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Period {
        pub start: DateTime<Utc>,
        pub end: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Totals {
        pub total_expense: i64,
        pub total_income: i64,
        pub net: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryTotalView {
        pub category_id: Option<i32>,
        pub category_name: Option<String>,
        pub category_type: Option<CategoryType>,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlySummaryView {
        pub month: String,
        pub period: Period,
        pub summary: Totals,
        pub by_category: Vec<CategoryTotalView>,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::transaction::*;
    use super::*;

    #[test]
    fn occurred_at_is_minute_precision_utc() {
        let parsed = occurred_at::parse("2024-01-10 09:30").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap());
        assert!(occurred_at::parse("2024-01-10T09:30:00Z").is_err());
        assert!(occurred_at::parse("10/01/2024 09:30").is_err());
    }

    #[test]
    fn new_transaction_is_tagged_by_type() {
        let body = json!({
            "type": "transfer",
            "from_wallet_id": 1,
            "to_wallet_id": 2,
            "amount": 500000,
            "occurred_at": "2024-01-10 09:00"
        });
        let parsed: TransactionNew = serde_json::from_value(body).unwrap();
        assert!(matches!(parsed, TransactionNew::Transfer(ref t) if t.amount == 500_000));
        assert!(parsed.validate().is_ok());

        let body = json!({
            "type": "expense",
            "wallet_id": 1,
            "category_id": null,
            "amount": 0,
            "occurred_at": "2024-01-10 09:00"
        });
        let parsed: TransactionNew = serde_json::from_value(body).unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn fractional_amount_is_refused() {
        let body = json!({
            "type": "income",
            "wallet_id": 1,
            "amount": 10.5,
            "occurred_at": "2024-01-10 09:00"
        });
        assert!(serde_json::from_value::<TransactionNew>(body).is_err());
    }

    #[test]
    fn update_tells_null_from_absent() {
        let cleared: TransactionUpdate = serde_json::from_value(json!({"category_id": null})).unwrap();
        assert_eq!(cleared.category_id, Some(None));

        let untouched: TransactionUpdate = serde_json::from_value(json!({"amount": 5})).unwrap();
        assert_eq!(untouched.category_id, None);
        assert_eq!(untouched.amount, Some(5));

        let set: TransactionUpdate = serde_json::from_value(json!({"category_id": 3})).unwrap();
        assert_eq!(set.category_id, Some(Some(3)));
    }

    #[test]
    fn responses_are_camel_case() {
        let view = balance::BalanceView {
            wallet_id: 1,
            wallet_name: "Cash".to_string(),
            currency: "IDR".to_string(),
            balance: -5,
        };
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(
            value,
            json!({"walletId": 1, "walletName": "Cash", "currency": "IDR", "balance": -5})
        );
    }
}
