//! Expense record entity.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{Amount, Currency, EngineError, PaymentMethod};

/// A validated, normalized expense record.
///
/// `category` is a referential snapshot: the name string copied at write
/// time, not a link to a live [`crate::Category`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub amount: Amount,
    pub currency: Currency,
    pub category: String,
    pub payment_method: PaymentMethod,
    pub incurred_at: DateTime<Utc>,
    /// Server-assigned at creation; immutable.
    pub recorded_at: DateTime<Utc>,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub tags: Vec<String>,
    pub receipt_image_path: Option<String>,
}

/// In-memory filters for expense listings and totals.
#[derive(Clone, Debug, Default)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub tag: Option<String>,
    pub merchant: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Blank or whitespace-only query values mean "no filter", matching
/// how clients send empty form fields.
pub(crate) fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ExpenseFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        active(&self.category).is_none()
            && active(&self.payment_method).is_none()
            && active(&self.tag).is_none()
            && active(&self.merchant).is_none()
            && self.start.is_none()
            && self.end.is_none()
    }

    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = active(&self.category)
            && expense.category.to_lowercase() != category.to_lowercase()
        {
            return false;
        }
        if let Some(method) = active(&self.payment_method)
            && expense.payment_method.as_str() != method.to_lowercase()
        {
            return false;
        }
        if let Some(tag) = active(&self.tag)
            && !expense.tags.iter().any(|t| t == tag)
        {
            return false;
        }
        if let Some(merchant) = active(&self.merchant) {
            let stored = expense.merchant.as_deref().unwrap_or("").to_lowercase();
            if stored != merchant.to_lowercase() {
                return false;
            }
        }
        if let Some(start) = self.start
            && expense.incurred_at < start
        {
            return false;
        }
        if let Some(end) = self.end
            && expense.incurred_at > end
        {
            return false;
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Monotonic insertion counter; listings order by it.
    pub seq: i64,
    pub amount_minor: i64,
    pub currency: String,
    pub category: String,
    pub payment_method: String,
    pub incurred_at: DateTimeUtc,
    pub recorded_at: DateTimeUtc,
    pub description: Option<String>,
    pub merchant: Option<String>,
    /// JSON array of strings.
    pub tags: String,
    pub receipt_image_path: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    /// Leaves `seq` unset; the store assigns it inside the insert
    /// transaction.
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            seq: ActiveValue::NotSet,
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            currency: ActiveValue::Set(expense.currency.code().to_string()),
            category: ActiveValue::Set(expense.category.clone()),
            payment_method: ActiveValue::Set(expense.payment_method.as_str().to_string()),
            incurred_at: ActiveValue::Set(expense.incurred_at),
            recorded_at: ActiveValue::Set(expense.recorded_at),
            description: ActiveValue::Set(expense.description.clone()),
            merchant: ActiveValue::Set(expense.merchant.clone()),
            tags: ActiveValue::Set(
                serde_json::to_string(&expense.tags).unwrap_or_else(|_| "[]".to_string()),
            ),
            receipt_image_path: ActiveValue::Set(expense.receipt_image_path.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|err| DbErr::Custom(format!("invalid expense id: {err}")))?,
            amount: Amount::from_cents(model.amount_minor),
            currency: Currency::try_from(model.currency.as_str())
                .map_err(|err| DbErr::Custom(format!("invalid stored currency: {err}")))?,
            category: model.category,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())
                .map_err(|err| DbErr::Custom(format!("invalid stored payment_method: {err}")))?,
            incurred_at: model.incurred_at,
            recorded_at: model.recorded_at,
            description: model.description,
            merchant: model.merchant,
            tags: serde_json::from_str(&model.tags)
                .map_err(|err| DbErr::Custom(format!("invalid stored tags: {err}")))?,
            receipt_image_path: model.receipt_image_path,
        })
    }
}
