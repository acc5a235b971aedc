//! The module contains the errors the engine can produce.
//!
//! The taxonomy mirrors the shared client contract:
//!
//! - [`Validation`] carries every field violation found in a payload.
//! - [`DuplicateCategory`] is a case-insensitive category name clash.
//! - [`NotFound`] is an unknown id on get/update/delete.
//! - [`ConflictingState`] is reserved for concurrent-write detection and
//!   is currently never produced.
//!
//! [`Validation`]: EngineError::Validation
//! [`DuplicateCategory`]: EngineError::DuplicateCategory
//! [`NotFound`]: EngineError::NotFound
//! [`ConflictingState`]: EngineError::ConflictingState

use std::fmt;

use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(ValidationReport),
    #[error("category \"{0}\" already exists")]
    DuplicateCategory(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("conflicting state: {0}")]
    ConflictingState(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::DuplicateCategory(a), Self::DuplicateCategory(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ConflictingState(a), Self::ConflictingState(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Classifies a single field violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    InvalidAmount,
    InvalidCurrency,
    InvalidMethod,
    InvalidText,
    InvalidPath,
    UnknownCategory,
    FutureDate,
    Immutable,
}

/// One field-level rule violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub kind: ViolationKind,
    pub message: String,
}

/// Collects every violation found while validating a candidate record,
/// so clients can report all problems in one round-trip.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn push(&mut self, field: &'static str, kind: ViolationKind, message: impl Into<String>) {
        self.violations.push(Violation {
            field,
            kind,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns `true` if any violation has the given kind.
    #[must_use]
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
            first = false;
        }
        Ok(())
    }
}

impl From<ValidationReport> for EngineError {
    fn from(report: ValidationReport) -> Self {
        EngineError::Validation(report)
    }
}
