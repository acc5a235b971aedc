//! Wire types shared by the server and its clients.
//!
//! Monetary amounts cross the wire as decimal strings with exactly two
//! fraction digits; the engine owns the integer-cents representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Deserializes a present field into `Some(inner)` so an explicit JSON
/// `null` (`Some(None)`) stays distinguishable from an omitted key
/// (outer `None` via `#[serde(default)]`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpsert {
        pub name: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub items: Vec<CategoryView>,
    }
}

pub mod expense {
    use super::*;

    /// Create/update payload for an expense.
    ///
    /// Every field is optional so the same body serves POST (create) and
    /// PUT (partial update); the validation engine enforces which fields
    /// are required on create and rejects changes to immutable ones.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpensePayload {
        pub id: Option<Uuid>,
        /// Decimal string, e.g. `"10.50"`.
        pub amount: Option<String>,
        pub currency: Option<String>,
        pub category: Option<String>,
        pub payment_method: Option<String>,
        /// RFC3339 instant; must not be in the future.
        pub incurred_at: Option<DateTime<Utc>>,
        pub recorded_at: Option<DateTime<Utc>>,
        /// Absent means keep the prior value, explicit `null` clears it.
        #[serde(
            default,
            deserialize_with = "super::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
        #[serde(
            default,
            deserialize_with = "super::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub merchant: Option<Option<String>>,
        pub tags: Option<Vec<String>>,
        #[serde(
            default,
            deserialize_with = "super::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub receipt_image_path: Option<Option<String>>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub amount: String,
        pub currency: String,
        pub category: String,
        pub payment_method: String,
        pub incurred_at: DateTime<Utc>,
        /// Server-assigned at creation; immutable.
        pub recorded_at: DateTime<Utc>,
        pub description: Option<String>,
        pub merchant: Option<String>,
        pub tags: Vec<String>,
        pub receipt_image_path: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub items: Vec<ExpenseView>,
        /// Total over the listed records, two fraction digits.
        pub total: String,
    }

    /// Query-string filters for `GET /expenses`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub category: Option<String>,
        pub payment_method: Option<String>,
        pub tag: Option<String>,
        pub merchant: Option<String>,
        pub start: Option<DateTime<Utc>>,
        pub end: Option<DateTime<Utc>>,
    }
}

pub mod income {
    use super::*;

    /// Create/update payload for an income. Same optional-field contract
    /// as [`super::expense::ExpensePayload`].
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct IncomePayload {
        pub id: Option<Uuid>,
        pub amount: Option<String>,
        pub currency: Option<String>,
        pub source: Option<String>,
        pub received_method: Option<String>,
        pub received_at: Option<DateTime<Utc>>,
        pub recorded_at: Option<DateTime<Utc>>,
        /// Absent means keep the prior value, explicit `null` clears it.
        #[serde(
            default,
            deserialize_with = "super::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
        pub tags: Option<Vec<String>>,
        #[serde(
            default,
            deserialize_with = "super::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub attachment_path: Option<Option<String>>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: Uuid,
        pub amount: String,
        pub currency: String,
        pub source: String,
        pub received_method: String,
        pub received_at: DateTime<Utc>,
        pub recorded_at: DateTime<Utc>,
        pub description: Option<String>,
        pub tags: Vec<String>,
        pub attachment_path: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeListResponse {
        pub items: Vec<IncomeView>,
        pub total: String,
    }

    /// Query-string filters for `GET /incomes`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct IncomeListQuery {
        pub source: Option<String>,
        pub received_method: Option<String>,
        pub tag: Option<String>,
        pub start: Option<DateTime<Utc>>,
        pub end: Option<DateTime<Utc>>,
    }
}

pub mod summary {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        /// Income total minus expense total; negative with a leading
        /// minus sign.
        pub balance: String,
    }

    /// Query-string filters for `GET /summary`. `category` narrows the
    /// expense side, `source` the income side, the rest apply to both.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SummaryQuery {
        pub category: Option<String>,
        pub source: Option<String>,
        pub tag: Option<String>,
        pub start: Option<DateTime<Utc>>,
        pub end: Option<DateTime<Utc>>,
    }
}

/// Error body returned for every non-2xx response. `details` is present
/// only for validation failures and lists every field violation at
/// once, `; `-separated.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
