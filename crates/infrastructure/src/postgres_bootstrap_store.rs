use groundwork_core::AppError;
use sqlx::PgPool;

mod catalog;
mod identity;
mod policies;

/// PostgreSQL-backed implementation of every bootstrap persistence port.
#[derive(Clone)]
pub struct PostgresBootstrapStore {
    pool: PgPool,
}

impl PostgresBootstrapStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps an insert failure, turning unique violations into conflicts.
fn insert_error(error: sqlx::Error, what: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("{what} already exists"));
    }

    AppError::Internal(format!("failed to create {what}: {error}"))
}

fn row_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[cfg(test)]
mod tests;
