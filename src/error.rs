use std::path::PathBuf;

use rusqlite::{Error as SqlError, ErrorCode};
use thiserror::Error;

/// Failures surfaced by the record store and the command handlers.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("cannot open student database at {}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No search results were found for \"{name}\".")]
    NoResultsFound { name: String },

    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Student {id} not found.")]
    RecordNotFound { id: i64 },

    #[error("unknown course \"{0}\"")]
    UnknownCourse(String),

    #[error(transparent)]
    Sql(SqlError),
}

impl From<SqlError> for RecordError {
    /// Coerce SQLite constraint errors into their own variant, and unwrap our
    /// own errors raised while converting a column (an unknown course).
    fn from(err: SqlError) -> Self {
        match err {
            SqlError::FromSqlConversionFailure(column, ty, source) => {
                match source.downcast::<RecordError>() {
                    Ok(inner) => *inner,
                    Err(source) => {
                        RecordError::Sql(SqlError::FromSqlConversionFailure(column, ty, source))
                    }
                }
            }
            err if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) => {
                RecordError::ConstraintViolation(err.to_string())
            }
            err => RecordError::Sql(err),
        }
    }
}

pub type Result<T, E = RecordError> = std::result::Result<T, E>;
