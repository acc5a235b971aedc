//! Income record endpoints.

use api_types::income::{IncomeListQuery, IncomeListResponse, IncomePayload, IncomeView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{Income, IncomeDraft, IncomeFilter};

fn view(income: Income) -> IncomeView {
    IncomeView {
        id: income.id,
        amount: income.amount.to_string(),
        currency: income.currency.code().to_string(),
        source: income.source,
        received_method: income.received_method.as_str().to_string(),
        received_at: income.received_at,
        recorded_at: income.recorded_at,
        description: income.description,
        tags: income.tags,
        attachment_path: income.attachment_path,
    }
}

fn draft(payload: IncomePayload) -> IncomeDraft {
    IncomeDraft {
        id: payload.id,
        amount: payload.amount,
        currency: payload.currency,
        source: payload.source,
        received_method: payload.received_method,
        received_at: payload.received_at,
        recorded_at: payload.recorded_at,
        description: payload.description,
        tags: payload.tags,
        attachment_path: payload.attachment_path,
    }
}

fn filter(query: IncomeListQuery) -> IncomeFilter {
    IncomeFilter {
        source: query.source,
        received_method: query.received_method,
        tag: query.tag,
        start: query.start,
        end: query.end,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<IncomeListQuery>,
) -> Result<Json<IncomeListResponse>, ServerError> {
    let filter = filter(query);
    let records = state.engine.list_incomes(&filter).await?;
    let total = state.engine.income_total(&filter).await?;
    Ok(Json(IncomeListResponse {
        items: records.into_iter().map(view).collect(),
        total: total.to_string(),
    }))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<IncomeView>, ServerError> {
    let income = state.engine.get_income(id).await?;
    Ok(Json(view(income)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<IncomePayload>,
) -> Result<(StatusCode, Json<IncomeView>), ServerError> {
    let income = state.engine.create_income(&draft(payload)).await?;
    Ok((StatusCode::CREATED, Json(view(income))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomePayload>,
) -> Result<Json<IncomeView>, ServerError> {
    let income = state.engine.update_income(id, &draft(payload)).await?;
    Ok(Json(view(income)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
