use thiserror::Error;

use crate::domain::models::payroll::Money;

/// Error taxonomy for domain operations.
///
/// All validation happens before any write; an operation that fails leaves
/// no partial state behind.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A record with the same key already exists; nothing changed.
    #[error("already exists")]
    AlreadyExists,

    /// The referenced ledger, day, learner or user does not exist.
    #[error("not found")]
    NotFound,

    /// Month outside the calendar range.
    #[error("invalid month: {month}. Must be between 1 and 12")]
    InvalidDate { month: u32 },

    /// Negative per-session rate.
    #[error("invalid rate: {rate}. Must be non-negative")]
    InvalidRate { rate: Money },

    /// Malformed input (blank name, blank credentials, wrong password).
    #[error("{0}")]
    InvalidInput(String),

    /// Storage failure, surfaced as-is; the caller decides whether to retry.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
