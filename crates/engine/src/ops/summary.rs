//! Cross-record aggregation.

use crate::{Amount, Engine, ExpenseFilter, IncomeFilter, ResultEngine};

impl Engine {
    /// Net balance: matching income total minus matching expense total,
    /// exact in integer cents. Empty ledgers report zero; pass default
    /// filters for the whole-ledger balance.
    pub async fn balance(
        &self,
        expenses: &ExpenseFilter,
        incomes: &IncomeFilter,
    ) -> ResultEngine<Amount> {
        let income = self.income_total(incomes).await?;
        let spent = self.expense_total(expenses).await?;
        Ok(income - spent)
    }
}
