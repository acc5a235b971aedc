//! Expense record operations.
//!
//! Creation and update validate inside the same transaction that writes,
//! so the category snapshot the validator sees is the one the write
//! lands against.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Amount, Engine, EngineError, Expense, ExpenseDraft, ExpenseFilter, ResultEngine, expenses,
    validate_expense,
};

use super::{categories::category_names, next_seq, table_total};

impl Engine {
    /// Lists expenses in insertion order, optionally filtered.
    pub async fn list_expenses(&self, filter: &ExpenseFilter) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .order_by_asc(expenses::Column::Seq)
            .all(self.database())
            .await?;

        let mut records = models
            .into_iter()
            .map(Expense::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        if !filter.is_empty() {
            records.retain(|expense| filter.matches(expense));
        }
        Ok(records)
    }

    pub async fn get_expense(&self, id: Uuid) -> ResultEngine<Expense> {
        let model = expenses::Entity::find_by_id(id.to_string())
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::NotFound("expense".to_string()))?;
        Expense::try_from(model)
    }

    /// Validates and stores a new expense, returning the record with its
    /// server-assigned id and `recorded_at`.
    pub async fn create_expense(&self, draft: &ExpenseDraft) -> ResultEngine<Expense> {
        let db_tx = self.database().begin().await?;

        let names = category_names(&db_tx).await?;
        let expense = validate_expense(draft, None, &names, Utc::now())?;

        let seq = next_seq(&db_tx, "expenses").await?;
        let mut active = expenses::ActiveModel::from(&expense);
        active.seq = ActiveValue::Set(seq);
        active.insert(&db_tx).await?;

        db_tx.commit().await?;
        Ok(expense)
    }

    /// Applies a partial update: fields present in the draft replace the
    /// stored ones, the merged record is re-validated as a whole, and
    /// only a fully valid result is written back.
    pub async fn update_expense(&self, id: Uuid, draft: &ExpenseDraft) -> ResultEngine<Expense> {
        let db_tx = self.database().begin().await?;

        let model = expenses::Entity::find_by_id(id.to_string())
            .one(&db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound("expense".to_string()))?;
        let existing = Expense::try_from(model)?;

        let names = category_names(&db_tx).await?;
        let merged = validate_expense(draft, Some(&existing), &names, Utc::now())?;

        // `seq` stays NotSet, so the insertion position is preserved.
        expenses::ActiveModel::from(&merged).update(&db_tx).await?;

        db_tx.commit().await?;
        Ok(merged)
    }

    pub async fn delete_expense(&self, id: Uuid) -> ResultEngine<()> {
        let outcome = expenses::Entity::delete_by_id(id.to_string())
            .exec(self.database())
            .await?;
        if outcome.rows_affected == 0 {
            return Err(EngineError::NotFound("expense".to_string()));
        }
        Ok(())
    }

    /// Exact total of matching expenses in integer cents.
    ///
    /// The unfiltered total is a single aggregate query; filtered totals
    /// sum the filtered listing so both paths agree with what a client
    /// sees.
    pub async fn expense_total(&self, filter: &ExpenseFilter) -> ResultEngine<Amount> {
        if filter.is_empty() {
            let cents = table_total(self.database(), "expenses").await?;
            return Ok(Amount::from_cents(cents));
        }

        let records = self.list_expenses(filter).await?;
        Ok(records
            .iter()
            .map(|e| e.amount)
            .fold(Amount::ZERO, |acc, amount| acc + amount))
    }
}
