use sqlx::Error as SqlxError;
use thiserror::Error;

const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[source] SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Custom: {0}")]
    Custom(String),
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => RepositoryError::NotFound,
            SqlxError::Database(ref db_err)
                if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
            {
                let constraint = db_err.constraint().unwrap_or("unknown constraint");
                RepositoryError::ForeignKey(constraint.to_string())
            }
            other => RepositoryError::Sqlx(other),
        }
    }
}
