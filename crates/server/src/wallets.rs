//! Wallets API endpoints.

use api_types::{
    Success,
    wallet::{WalletNew, WalletRename, WalletSummaryQuery, WalletSummaryView, WalletView},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::Currency;

use crate::{ServerError, server::ServerState, views};

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state.engine.list_wallets().await?;
    Ok(Json(wallets.into_iter().map(views::wallet).collect()))
}

pub async fn wallet_new(
    State(state): State<ServerState>,
    payload: Result<Json<WalletNew>, JsonRejection>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let Json(payload) = payload?;
    let currency = payload
        .currency
        .as_deref()
        .map(Currency::try_from)
        .transpose()?;
    let wallet = state.engine.new_wallet(&payload.name, currency).await?;
    tracing::debug!(wallet_id = wallet.id, "wallet created");
    Ok((StatusCode::CREATED, Json(views::wallet(wallet))))
}

pub async fn rename(
    State(state): State<ServerState>,
    wallet_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<WalletRename>, JsonRejection>,
) -> Result<Json<WalletView>, ServerError> {
    let Path(wallet_id) = wallet_id?;
    let Json(payload) = payload?;
    let wallet = state.engine.rename_wallet(wallet_id, &payload.name).await?;
    Ok(Json(views::wallet(wallet)))
}

pub async fn delete(
    State(state): State<ServerState>,
    wallet_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Success>, ServerError> {
    let Path(wallet_id) = wallet_id?;
    state.engine.delete_wallet(wallet_id).await?;
    tracing::debug!(wallet_id, "wallet deleted");
    Ok(Json(Success::ok()))
}

pub async fn summary(
    State(state): State<ServerState>,
    wallet_id: Result<Path<i32>, PathRejection>,
    query: Result<Query<WalletSummaryQuery>, QueryRejection>,
) -> Result<Json<WalletSummaryView>, ServerError> {
    let Path(wallet_id) = wallet_id?;
    let Query(query) = query?;
    let summary = state
        .engine
        .wallet_summary(wallet_id, query.from, query.to)
        .await?;
    Ok(Json(views::wallet_summary(summary)))
}

pub async fn summaries(
    State(state): State<ServerState>,
) -> Result<Json<Vec<WalletSummaryView>>, ServerError> {
    let summaries = state.engine.wallet_summaries().await?;
    Ok(Json(
        summaries.into_iter().map(views::wallet_summary).collect(),
    ))
}
