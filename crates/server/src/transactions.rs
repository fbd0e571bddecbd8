//! Transactions API endpoints.

use api_types::{
    Success,
    transaction::{
        EntryNew, TransactionList, TransactionListItem, TransactionNew, TransactionUpdate,
        TransactionView, TransferNew,
    },
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::{EntryCmd, EntryKind, TransferCmd, TransactionListFilter, TxMeta, UpdateTransactionCmd};

use crate::{ServerError, server::ServerState, views};

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<TransactionList>, QueryRejection>,
) -> Result<Json<Vec<TransactionListItem>>, ServerError> {
    let Query(query) = query?;
    let filter = TransactionListFilter {
        kind: query.kind.map(views::engine_type),
        wallet_id: query.wallet_id,
        category_id: query.category_id,
        date_from: query.date_from,
        date_to: query.date_to,
        search: query.search,
        sort: query.sort.map(views::sort_order).unwrap_or_default(),
    };
    let items = state.engine.list_transactions(&filter).await?;
    Ok(Json(items.into_iter().map(views::list_item).collect()))
}

fn entry_cmd(kind: EntryKind, entry: EntryNew) -> EntryCmd {
    EntryCmd {
        kind,
        wallet_id: entry.wallet_id,
        category_id: entry.category_id,
        amount_minor: entry.amount,
        meta: TxMeta {
            note: entry.note,
            occurred_at: entry.occurred_at,
        },
    }
}

fn transfer_cmd(transfer: TransferNew) -> TransferCmd {
    TransferCmd {
        from_wallet_id: transfer.from_wallet_id,
        to_wallet_id: transfer.to_wallet_id,
        amount_minor: transfer.amount,
        meta: TxMeta {
            note: transfer.note,
            occurred_at: transfer.occurred_at,
        },
    }
}

/// Income and expense answer with the created row, transfers with both legs.
pub async fn transaction_new(
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(payload) = payload?;
    payload.validate().map_err(ServerError::Generic)?;

    let response = match payload {
        TransactionNew::Expense(entry) => {
            let tx = state
                .engine
                .create_entry(entry_cmd(EntryKind::Expense, entry))
                .await?;
            (StatusCode::CREATED, Json(views::transaction(tx))).into_response()
        }
        TransactionNew::Income(entry) => {
            let tx = state
                .engine
                .create_entry(entry_cmd(EntryKind::Income, entry))
                .await?;
            (StatusCode::CREATED, Json(views::transaction(tx))).into_response()
        }
        TransactionNew::Transfer(transfer) => {
            let created = state.engine.transfer(transfer_cmd(transfer)).await?;
            tracing::debug!(
                transfer_group_id = created.transfer_group_id,
                "transfer created"
            );
            (StatusCode::CREATED, Json(views::transfer_created(created))).into_response()
        }
    };
    Ok(response)
}

pub async fn get(
    State(state): State<ServerState>,
    transaction_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let Path(transaction_id) = transaction_id?;
    let tx = state.engine.transaction(transaction_id).await?;
    Ok(Json(views::transaction(tx)))
}

pub async fn update(
    State(state): State<ServerState>,
    transaction_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let Path(transaction_id) = transaction_id?;
    let Json(payload) = payload?;
    payload.validate().map_err(ServerError::Generic)?;

    let cmd = UpdateTransactionCmd {
        transaction_id,
        amount_minor: payload.amount,
        occurred_at: payload.occurred_at,
        note: payload.note,
        wallet_id: payload.wallet_id,
        category_id: payload.category_id,
        from_wallet_id: payload.from_wallet_id,
        to_wallet_id: payload.to_wallet_id,
    };
    let tx = state.engine.update_transaction(cmd).await?;
    Ok(Json(views::transaction(tx)))
}

pub async fn delete(
    State(state): State<ServerState>,
    transaction_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Success>, ServerError> {
    let Path(transaction_id) = transaction_id?;
    state.engine.delete_transaction(transaction_id).await?;
    tracing::debug!(transaction_id, "transaction deleted");
    Ok(Json(Success::ok()))
}
