//! Core ledger engine: validation, persistence, and aggregation for
//! expense and income records plus the category registry.
//!
//! The engine owns a [`DatabaseConnection`] and exposes async operations
//! grouped under [`ops`]. All reads go back to the store, so a client
//! that refetches after every mutation always observes its own writes.

use sea_orm::DatabaseConnection;

pub use categories::{Category, normalize_name};
pub use currency::{Currency, ParseCurrencyError};
pub use error::{EngineError, ValidationReport, Violation, ViolationKind};
pub use expenses::{Expense, ExpenseFilter};
pub use incomes::{Income, IncomeFilter};
pub use methods::{ParseMethodError, PaymentMethod, ReceivedMethod};
pub use money::{Amount, ParseAmountError};
pub use validate::{ExpenseDraft, IncomeDraft, validate_expense, validate_income};

mod categories;
mod currency;
mod error;
mod expenses;
mod incomes;
mod methods;
mod money;
mod ops;
mod validate;

pub(crate) type ResultEngine<T> = Result<T, EngineError>;

/// The ledger engine. Cheap to share behind an `Arc`; every operation
/// takes `&self`.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`.
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
