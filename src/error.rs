use async_graphql::ErrorExtensions;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Failure reported by the score store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database unavailable: {0}")]
    Unavailable(sqlx::Error),

    #[error("constraint violated: {0}")]
    Constraint(sqlx::Error),

    #[error("query failed: {0}")]
    Query(sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StorageError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => Self::Unavailable(error),
            sqlx::Error::Database(database_error) => match database_error.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => Self::Constraint(error),
                _ => Self::Query(error),
            },
            _ => Self::Query(error),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No field bounds are enforced on submissions yet, so nothing raises this.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl ErrorExtensions for ServiceError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, extensions| {
            extensions.set("code", self.code());
        })
    }
}

pub type ServiceResult<T, E = ServiceError> = std::result::Result<T, E>;
