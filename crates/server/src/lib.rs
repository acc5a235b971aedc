use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::ErrorResponse;
pub use server::{app, run, run_with_listener, spawn_with_listener};

mod categories;
mod expenses;
mod incomes;
mod server;
mod summary;

pub mod types {
    pub mod category {
        pub use api_types::category::{CategoryListResponse, CategoryUpsert, CategoryView};
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseListQuery, ExpenseListResponse, ExpensePayload, ExpenseView,
        };
    }

    pub mod income {
        pub use api_types::income::{
            IncomeListQuery, IncomeListResponse, IncomePayload, IncomeView,
        };
    }

    pub mod summary {
        pub use api_types::summary::{SummaryQuery, SummaryResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::DuplicateCategory(_) | EngineError::ConflictingState(_) => {
            StatusCode::CONFLICT
        }
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorResponse {
    match err {
        EngineError::Validation(report) => ErrorResponse {
            error: "validation failed".to_string(),
            details: Some(report.to_string()),
        },
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ErrorResponse {
                error: "internal server error".to_string(),
                details: None,
            }
        }
        other => ErrorResponse {
            error: other.to_string(),
            details: None,
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: err,
                    details: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
