//! Crate-wide error type and `Result` alias.
//!
//! Variants fall into four groups the caller can act on: validation failures
//! and not-found lookups are rejected before any write, conflicts mean a
//! concurrent writer got there first, and database/IO failures cover the
//! storage layer. Because every mutating operation runs inside a single
//! database transaction, a failed call leaves no partial state and the
//! retryable kinds can be re-issued as a whole.

use thiserror::Error;

/// Errors produced by the ledger core.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: String },

    #[error("Account not found: {id}")]
    AccountNotFound { id: String },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("No budget set for {scope}")]
    BudgetNotFound { scope: String },

    #[error("Account '{name}' is not a credit account")]
    CreditAccountRequired { name: String },

    #[error("Transfer source and destination accounts must differ")]
    SameAccountTransfer,

    #[error("Concurrent modification detected: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller may safely retry the whole operation.
    ///
    /// Conflicts and storage failures happen inside an uncommitted database
    /// transaction, so no partial effect survives them. Validation and
    /// not-found errors are deterministic and will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Database(_))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let conflict = Error::Conflict {
            message: "balance row changed".to_string(),
        };
        assert!(conflict.is_retryable());

        let not_found = Error::AccountNotFound {
            id: "missing".to_string(),
        };
        assert!(!not_found.is_retryable());

        let validation = Error::SameAccountTransfer;
        assert!(!validation.is_retryable());
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::CreditAccountRequired {
            name: "Visa".to_string(),
        };
        assert_eq!(err.to_string(), "Account 'Visa' is not a credit account");

        let err = Error::BudgetNotFound {
            scope: "global".to_string(),
        };
        assert_eq!(err.to_string(), "No budget set for global");
    }
}
