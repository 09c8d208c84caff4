//! Errors of the PostgreSQL helpers

use sqlx::migrate::MigrateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The pool could not open its first connection
    #[error("cannot connect to {target}: {source}")]
    Connection {
        /// Host and database, without credentials
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migration(#[from] MigrateError),

    /// `DATABASE_URL` or a pool setting is unusable
    #[error("invalid database settings: {0}")]
    Configuration(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
