use api_types::balance::{BalanceQuery, BalanceView};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{ServerError, server::ServerState, views};

pub async fn get(
    State(state): State<ServerState>,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> Result<Json<Vec<BalanceView>>, ServerError> {
    let Query(query) = query?;
    let balances = state.engine.balances(query.wallet_id).await?;
    Ok(Json(balances.into_iter().map(views::balance).collect()))
}
