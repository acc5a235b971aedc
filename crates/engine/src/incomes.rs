//! Income record entity.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{Amount, Currency, EngineError, ReceivedMethod, expenses::active};

/// A validated, normalized income record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Income {
    pub id: Uuid,
    pub amount: Amount,
    pub currency: Currency,
    pub source: String,
    pub received_method: ReceivedMethod,
    pub received_at: DateTime<Utc>,
    /// Server-assigned at creation; immutable.
    pub recorded_at: DateTime<Utc>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub attachment_path: Option<String>,
}

/// In-memory filters for income listings and totals.
#[derive(Clone, Debug, Default)]
pub struct IncomeFilter {
    pub source: Option<String>,
    pub received_method: Option<String>,
    pub tag: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl IncomeFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        active(&self.source).is_none()
            && active(&self.received_method).is_none()
            && active(&self.tag).is_none()
            && self.start.is_none()
            && self.end.is_none()
    }

    #[must_use]
    pub fn matches(&self, income: &Income) -> bool {
        if let Some(source) = active(&self.source)
            && income.source.to_lowercase() != source.to_lowercase()
        {
            return false;
        }
        if let Some(method) = active(&self.received_method)
            && income.received_method.as_str() != method.to_lowercase()
        {
            return false;
        }
        if let Some(tag) = active(&self.tag)
            && !income.tags.iter().any(|t| t == tag)
        {
            return false;
        }
        if let Some(start) = self.start
            && income.received_at < start
        {
            return false;
        }
        if let Some(end) = self.end
            && income.received_at > end
        {
            return false;
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Monotonic insertion counter; listings order by it.
    pub seq: i64,
    pub amount_minor: i64,
    pub currency: String,
    pub source: String,
    pub received_method: String,
    pub received_at: DateTimeUtc,
    pub recorded_at: DateTimeUtc,
    pub description: Option<String>,
    /// JSON array of strings.
    pub tags: String,
    pub attachment_path: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Income> for ActiveModel {
    /// Leaves `seq` unset; the store assigns it inside the insert
    /// transaction.
    fn from(income: &Income) -> Self {
        Self {
            id: ActiveValue::Set(income.id.to_string()),
            seq: ActiveValue::NotSet,
            amount_minor: ActiveValue::Set(income.amount.cents()),
            currency: ActiveValue::Set(income.currency.code().to_string()),
            source: ActiveValue::Set(income.source.clone()),
            received_method: ActiveValue::Set(income.received_method.as_str().to_string()),
            received_at: ActiveValue::Set(income.received_at),
            recorded_at: ActiveValue::Set(income.recorded_at),
            description: ActiveValue::Set(income.description.clone()),
            tags: ActiveValue::Set(
                serde_json::to_string(&income.tags).unwrap_or_else(|_| "[]".to_string()),
            ),
            attachment_path: ActiveValue::Set(income.attachment_path.clone()),
        }
    }
}

impl TryFrom<Model> for Income {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|err| DbErr::Custom(format!("invalid income id: {err}")))?,
            amount: Amount::from_cents(model.amount_minor),
            currency: Currency::try_from(model.currency.as_str())
                .map_err(|err| DbErr::Custom(format!("invalid stored currency: {err}")))?,
            source: model.source,
            received_method: ReceivedMethod::try_from(model.received_method.as_str())
                .map_err(|err| DbErr::Custom(format!("invalid stored received_method: {err}")))?,
            received_at: model.received_at,
            recorded_at: model.recorded_at,
            description: model.description,
            tags: serde_json::from_str(&model.tags)
                .map_err(|err| DbErr::Custom(format!("invalid stored tags: {err}")))?,
            attachment_path: model.attachment_path,
        })
    }
}
