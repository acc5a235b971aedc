//! Income record operations.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Amount, Engine, EngineError, Income, IncomeDraft, IncomeFilter, ResultEngine, incomes,
    validate_income,
};

use super::{next_seq, table_total};

impl Engine {
    /// Lists incomes in insertion order, optionally filtered.
    pub async fn list_incomes(&self, filter: &IncomeFilter) -> ResultEngine<Vec<Income>> {
        let models = incomes::Entity::find()
            .order_by_asc(incomes::Column::Seq)
            .all(self.database())
            .await?;

        let mut records = models
            .into_iter()
            .map(Income::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        if !filter.is_empty() {
            records.retain(|income| filter.matches(income));
        }
        Ok(records)
    }

    pub async fn get_income(&self, id: Uuid) -> ResultEngine<Income> {
        let model = incomes::Entity::find_by_id(id.to_string())
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::NotFound("income".to_string()))?;
        Income::try_from(model)
    }

    /// Validates and stores a new income, returning the record with its
    /// server-assigned id and `recorded_at`.
    pub async fn create_income(&self, draft: &IncomeDraft) -> ResultEngine<Income> {
        let db_tx = self.database().begin().await?;

        let income = validate_income(draft, None, Utc::now())?;

        let seq = next_seq(&db_tx, "incomes").await?;
        let mut active = incomes::ActiveModel::from(&income);
        active.seq = ActiveValue::Set(seq);
        active.insert(&db_tx).await?;

        db_tx.commit().await?;
        Ok(income)
    }

    /// Applies a partial update against the stored record and writes the
    /// merged result back only if it validates as a whole.
    pub async fn update_income(&self, id: Uuid, draft: &IncomeDraft) -> ResultEngine<Income> {
        let db_tx = self.database().begin().await?;

        let model = incomes::Entity::find_by_id(id.to_string())
            .one(&db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound("income".to_string()))?;
        let existing = Income::try_from(model)?;

        let merged = validate_income(draft, Some(&existing), Utc::now())?;

        // `seq` stays NotSet, so the insertion position is preserved.
        incomes::ActiveModel::from(&merged).update(&db_tx).await?;

        db_tx.commit().await?;
        Ok(merged)
    }

    pub async fn delete_income(&self, id: Uuid) -> ResultEngine<()> {
        let outcome = incomes::Entity::delete_by_id(id.to_string())
            .exec(self.database())
            .await?;
        if outcome.rows_affected == 0 {
            return Err(EngineError::NotFound("income".to_string()));
        }
        Ok(())
    }

    /// Exact total of matching incomes in integer cents.
    pub async fn income_total(&self, filter: &IncomeFilter) -> ResultEngine<Amount> {
        if filter.is_empty() {
            let cents = table_total(self.database(), "incomes").await?;
            return Ok(Amount::from_cents(cents));
        }

        let records = self.list_incomes(filter).await?;
        Ok(records
            .iter()
            .map(|i| i.amount)
            .fold(Amount::ZERO, |acc, amount| acc + amount))
    }
}
