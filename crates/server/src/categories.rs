//! Categories API endpoints.

use api_types::{
    Success,
    category::{CategoryList, CategoryNew, CategoryView},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, views};

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<CategoryList>, QueryRejection>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let Query(query) = query?;
    let categories = state
        .engine
        .list_categories(query.kind.map(views::category_kind))
        .await?;
    Ok(Json(categories.into_iter().map(views::category).collect()))
}

pub async fn category_new(
    State(state): State<ServerState>,
    payload: Result<Json<CategoryNew>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Json(payload) = payload?;
    let category = state
        .engine
        .new_category(&payload.name, views::category_kind(payload.kind))
        .await?;
    Ok((StatusCode::CREATED, Json(views::category(category))))
}

pub async fn delete(
    State(state): State<ServerState>,
    category_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Success>, ServerError> {
    let Path(category_id) = category_id?;
    state.engine.delete_category(category_id).await?;
    Ok(Json(Success::ok()))
}
