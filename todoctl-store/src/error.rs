//! Error types for todoctl-store
//!
//! Engine errors are classified by kind and constraint name so callers can
//! match on variants instead of SQLSTATE codes.

use sqlx::error::ErrorKind;
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

use crate::models::ValidationError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("duplicate key value violates unique constraint \"{constraint}\"")]
    UniqueViolation { constraint: String },

    #[error("foreign key violation on \"{constraint}\"")]
    ForeignKeyViolation { constraint: String },

    #[error("null value in column \"{column}\" violates not-null constraint")]
    NotNullViolation { column: String },

    #[error("current transaction is aborted, commands ignored until end of transaction block")]
    TransactionAborted,

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, Self::ForeignKeyViolation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Constraint named by the engine, for constraint violations.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint } | Self::ForeignKeyViolation { constraint } => {
                Some(constraint)
            }
            _ => None,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default().to_owned();
            match db_err.kind() {
                ErrorKind::UniqueViolation => return Self::UniqueViolation { constraint },
                ErrorKind::ForeignKeyViolation => return Self::ForeignKeyViolation { constraint },
                ErrorKind::NotNullViolation => {
                    let column = db_err
                        .try_downcast_ref::<PgDatabaseError>()
                        .and_then(|pg| pg.column())
                        .unwrap_or_default()
                        .to_owned();
                    return Self::NotNullViolation { column };
                }
                _ => {}
            }
        }
        Self::Database(err)
    }
}
