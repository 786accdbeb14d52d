//! Running SQL script files
//!
//! A script is read whole, optionally has its table prefix rewritten, and is
//! executed as a single batch.

use crate::error::SqlError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Something that can run a multi-statement script
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Rows affected by the whole batch
    async fn execute_script(&self, sql: &str) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl SqlExecutor for SqlitePool {
    async fn execute_script(&self, sql: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::raw_sql(sql).execute(self).await?;
        Ok(result.rows_affected())
    }
}

/// Table prefix rewrite applied to a script before it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixReplacement<'a> {
    pub old: &'a str,
    pub new: &'a str,
}

impl<'a> PrefixReplacement<'a> {
    pub fn new(old: &'a str, new: &'a str) -> Self {
        Self { old, new }
    }

    pub fn apply(&self, sql: &str) -> String {
        if self.old.is_empty() {
            return sql.to_string();
        }
        sql.replace(self.old, self.new)
    }
}

/// Open (creating if needed) a SQLite database such as `sqlite://site.db`
pub async fn connect_sqlite(url: &str) -> Result<SqlitePool, SqlError> {
    let failed = |e: sqlx::Error| SqlError::Execution {
        path: url.to_string(),
        message: e.to_string(),
    };
    let options = SqliteConnectOptions::from_str(url)
        .map_err(failed)?
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(failed)
}

/// Run the script at `path` through `executor`
pub async fn exec_file_query<E>(
    executor: &E,
    path: &Path,
    prefix: Option<PrefixReplacement<'_>>,
) -> Result<u64, SqlError>
where
    E: SqlExecutor + ?Sized,
{
    if !path.is_file() {
        return Err(SqlError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| SqlError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let script = match prefix {
        Some(replacement) => replacement.apply(&content),
        None => content,
    };

    let affected = executor
        .execute_script(&script)
        .await
        .map_err(|e| SqlError::Execution {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    log::debug!("{} executed, {} rows affected", path.display(), affected);
    Ok(affected)
}
