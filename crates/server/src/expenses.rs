//! Expense record endpoints.

use api_types::expense::{ExpenseListQuery, ExpenseListResponse, ExpensePayload, ExpenseView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{Expense, ExpenseDraft, ExpenseFilter};

fn view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount: expense.amount.to_string(),
        currency: expense.currency.code().to_string(),
        category: expense.category,
        payment_method: expense.payment_method.as_str().to_string(),
        incurred_at: expense.incurred_at,
        recorded_at: expense.recorded_at,
        description: expense.description,
        merchant: expense.merchant,
        tags: expense.tags,
        receipt_image_path: expense.receipt_image_path,
    }
}

fn draft(payload: ExpensePayload) -> ExpenseDraft {
    ExpenseDraft {
        id: payload.id,
        amount: payload.amount,
        currency: payload.currency,
        category: payload.category,
        payment_method: payload.payment_method,
        incurred_at: payload.incurred_at,
        recorded_at: payload.recorded_at,
        description: payload.description,
        merchant: payload.merchant,
        tags: payload.tags,
        receipt_image_path: payload.receipt_image_path,
    }
}

fn filter(query: ExpenseListQuery) -> ExpenseFilter {
    ExpenseFilter {
        category: query.category,
        payment_method: query.payment_method,
        tag: query.tag,
        merchant: query.merchant,
        start: query.start,
        end: query.end,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let filter = filter(query);
    let records = state.engine.list_expenses(&filter).await?;
    let total = state.engine.expense_total(&filter).await?;
    Ok(Json(ExpenseListResponse {
        items: records.into_iter().map(view).collect(),
        total: total.to_string(),
    }))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.get_expense(id).await?;
    Ok(Json(view(expense)))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state.engine.create_expense(&draft(payload)).await?;
    Ok((StatusCode::CREATED, Json(view(expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.update_expense(id, &draft(payload)).await?;
    Ok(Json(view(expense)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
