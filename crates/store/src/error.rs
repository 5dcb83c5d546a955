//! Store error types.

use folio_core::ledger::{ErrorKind, LedgerError};
use folio_shared::AppError;
use folio_shared::types::EntityId;
use thiserror::Error;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the books.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The entity has no books.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Books already exist for the entity.
    #[error("Entity already registered: {0}")]
    EntityExists(EntityId),

    /// A record of another entity was handed to this entity's session.
    #[error("Record belongs to entity {actual}, not {expected}")]
    WrongEntity {
        /// Entity of the session.
        expected: EntityId,
        /// Entity named by the record.
        actual: EntityId,
    },
}

impl StoreError {
    /// Returns the broad kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(error) => error.kind(),
            Self::EntityNotFound(_) => ErrorKind::NotFound,
            Self::EntityExists(_) => ErrorKind::State,
            Self::WrongEntity { .. } => ErrorKind::Referential,
        }
    }

    /// Returns the error code for machine readable output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(error) => error.error_code(),
            Self::EntityNotFound(_) => "ENTITY_NOT_FOUND",
            Self::EntityExists(_) => "ENTITY_EXISTS",
            Self::WrongEntity { .. } => "WRONG_ENTITY",
        }
    }

    /// Returns true if repeating the whole unit of work may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Ledger(error) if error.is_retryable())
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Ledger(error) => error.into(),
            StoreError::EntityNotFound(_) => Self::NotFound(value.to_string()),
            StoreError::EntityExists(_) => Self::State(value.to_string()),
            StoreError::WrongEntity { .. } => Self::Referential(value.to_string()),
        }
    }
}
