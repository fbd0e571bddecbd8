use api_types::transaction::TransferLegView;
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{ServerError, server::ServerState, views};

/// Both legs of a transfer, outgoing first.
pub async fn get(
    State(state): State<ServerState>,
    group_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<TransferLegView>>, ServerError> {
    let Path(group_id) = group_id?;
    let legs = state.engine.transfer_legs(group_id).await?;
    Ok(Json(views::transfer_legs(legs)))
}
