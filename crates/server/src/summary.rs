//! Ledger summary endpoint.

use api_types::summary::{SummaryQuery, SummaryResponse};
use axum::{
    Json,
    extract::{Query, State},
};
use engine::{ExpenseFilter, IncomeFilter};

use crate::{ServerError, server::ServerState};

/// Net balance, exact to the cent. With no query filters this covers
/// the whole ledger; `category` narrows the expense side, `source` the
/// income side, `tag`/`start`/`end` both.
pub async fn get_summary(
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let expenses = ExpenseFilter {
        category: query.category,
        tag: query.tag.clone(),
        start: query.start,
        end: query.end,
        ..Default::default()
    };
    let incomes = IncomeFilter {
        source: query.source,
        tag: query.tag,
        start: query.start,
        end: query.end,
        ..Default::default()
    };
    let balance = state.engine.balance(&expenses, &incomes).await?;
    Ok(Json(SummaryResponse {
        balance: balance.to_string(),
    }))
}
