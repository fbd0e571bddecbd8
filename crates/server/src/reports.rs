//! Reporting endpoints.

use api_types::report::{MonthlySummaryQuery, MonthlySummaryView};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{ServerError, server::ServerState, views};

pub async fn monthly_summary(
    State(state): State<ServerState>,
    query: Result<Query<MonthlySummaryQuery>, QueryRejection>,
) -> Result<Json<MonthlySummaryView>, ServerError> {
    let Query(query) = query?;
    tracing::debug!(month = %query.month, "monthly summary requested");
    let summary = state.engine.monthly_summary(&query.month).await?;
    Ok(Json(views::monthly_summary(summary)))
}
