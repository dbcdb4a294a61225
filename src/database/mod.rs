use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

mod score;
mod store;

pub use score::{NewScore, ScoreRecord};
pub use store::ScoreStore;

pub type DatabasePool = sqlx::SqlitePool;
pub type ScoreId = i64;

/// Opens a pool for `database_url`, creating the database file if it is missing.
pub async fn connect(database_url: &str) -> Result<DatabasePool, StorageError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn migrate(pool: &DatabasePool) -> Result<(), StorageError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// A migrated in-memory database. Pinned to one connection that never
/// expires, since every sqlite `:memory:` connection is its own database.
#[cfg(test)]
pub async fn connect_in_memory() -> DatabasePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open an in-memory database");
    migrate(&pool).await.expect("failed to apply migrations");
    pool
}
