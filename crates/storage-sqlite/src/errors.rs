//! Storage-specific error types for SQLite operations.
//!
//! Diesel and r2d2 errors are wrapped here and converted to the
//! database-agnostic errors of `commissions_core` at the crate boundary.

use commissions_core::errors::{DatabaseError, Error, ValidationError};
use diesel::result::Error as DieselError;
use thiserror::Error;

/// Storage-specific errors that wrap Diesel and r2d2 types.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Stored value for '{column}' is not a decimal: {value}")]
    CorruptDecimal { column: &'static str, value: String },

    #[error(transparent)]
    Core(Error),
}

/// Lets the write actor run core-returning jobs inside a diesel transaction.
impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Core(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::CorruptDecimal { column, value } => {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "column {} holds non-decimal value '{}'",
                    column, value
                )))
            }
            StorageError::Core(e) => e,
        }
    }
}

/// Extension trait for converting Diesel and r2d2 Results to core Results.
pub trait IntoCore<T> {
    fn into_core(self) -> commissions_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> commissions_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> commissions_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}
