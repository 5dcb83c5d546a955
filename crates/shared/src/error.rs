//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// The first four variants mirror the accounting error taxonomy; the rest are
/// infrastructure failures.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before any mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the entity's current lifecycle state.
    #[error("State error: {0}")]
    State(String),

    /// Two linked entities violate a structural rule.
    #[error("Referential error: {0}")]
    Referential(String),

    /// A quantity exceeds what is available.
    #[error("Capacity error: {0}")]
    Capacity(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflicting concurrent write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::State(_) => 3,
            Self::Referential(_) => 4,
            Self::Capacity(_) => 5,
            Self::NotFound(_) => 6,
            Self::Conflict(_) => 7,
            Self::Configuration(_) => 78,
            Self::Internal(_) => 70,
        }
    }

    /// Returns the error code for machine readable output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::State(_) => "STATE_ERROR",
            Self::Referential(_) => "REFERENTIAL_ERROR",
            Self::Capacity(_) => "CAPACITY_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(value: config::ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}
