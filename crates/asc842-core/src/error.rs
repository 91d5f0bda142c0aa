use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Error)]
pub enum LeaseAccountingError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Export error: {0}")]
    ExportError(String),
}

impl LeaseAccountingError {
    /// True for errors caused by the caller's input rather than the computation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LeaseAccountingError::InvalidInput { .. } | LeaseAccountingError::Validation(_)
        )
    }

    /// Field-level messages, one per violated rule.
    pub fn violation_messages(&self) -> Vec<String> {
        match self {
            LeaseAccountingError::Validation(violations) => {
                violations.iter().map(|v| v.message.clone()).collect()
            }
            LeaseAccountingError::InvalidInput { field, reason } => {
                vec![format!("{field}: {reason}")]
            }
            other => vec![other.to_string()],
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for LeaseAccountingError {
    fn from(e: serde_json::Error) -> Self {
        LeaseAccountingError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "export")]
impl From<rust_xlsxwriter::XlsxError> for LeaseAccountingError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        LeaseAccountingError::ExportError(e.to_string())
    }
}
