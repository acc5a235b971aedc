//! Category registry endpoints.

use api_types::category::{CategoryListResponse, CategoryUpsert, CategoryView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::Category;

fn view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let items = state
        .engine
        .list_categories()
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(CategoryListResponse { items }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryUpsert>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state.engine.create_category(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(view(category))))
}

pub async fn rename(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpsert>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.rename_category(id, &payload.name).await?;
    Ok(Json(view(category)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
