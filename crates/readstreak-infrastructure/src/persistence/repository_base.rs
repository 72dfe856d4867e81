use readstreak_domain::shared::DomainError;
use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteQueryResult, SqliteRow};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

/// Shared plumbing for SQLite repositories: runs a query against the pool
/// and turns driver errors into `DomainError::Repository` tagged with what
/// was being attempted.
#[derive(Clone)]
pub struct SqliteRepositoryBase {
    pool: Arc<SqlitePool>,
}

impl SqliteRepositoryBase {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn execute<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<SqliteQueryResult, DomainError> {
        query
            .execute(self.pool())
            .await
            .map_err(|e| Self::repo_err(context, e))
    }

    pub async fn fetch_optional<'q, T>(
        &self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<Option<T>, DomainError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        query
            .fetch_optional(self.pool())
            .await
            .map_err(|e| Self::repo_err(context, e))
    }

    pub async fn fetch_all<'q, T>(
        &self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
        context: &str,
    ) -> Result<Vec<T>, DomainError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        query
            .fetch_all(self.pool())
            .await
            .map_err(|e| Self::repo_err(context, e))
    }

    fn repo_err(context: &str, err: sqlx::Error) -> DomainError {
        tracing::warn!(context, error = %err, "SQLite query failed");
        DomainError::Repository(format!("{}: {}", context, err))
    }
}
