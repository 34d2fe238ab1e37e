//! Row store adapter contract.
//!
//! The catalog core only ever talks to its backing tables through
//! [`RowStore`]: whole-table reads, positional overwrite/append/delete, and a
//! best-effort transaction scope. Positions are 0-based indexes into the
//! `read_all` result (header excluded) and never leak past the repositories.

pub mod memory;

pub use memory::MemoryRowStore;

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::warn;

pub type Row = Vec<String>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table '{0}' does not exist")]
    MissingTable(String),

    #[error("Row {index} is out of range for table '{table}'")]
    RowOutOfRange { table: String, index: usize },

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Write to table '{table}' failed: {message}")]
    WriteFailed { table: String, message: String },

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// The table the failure concerns, when known.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::MissingTable(table)
            | Self::RowOutOfRange { table, .. }
            | Self::WriteFailed { table, .. } => Some(table),
            Self::Transaction(_) | Self::Backend(_) => None,
        }
    }
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Backend(format!("Malformed row payload: {err}"))
    }
}

#[async_trait::async_trait]
pub trait RowStore: Send + Sync {
    /// All data rows of `table` in storage order.
    async fn read_all(&self, table: &str) -> Result<Vec<Row>, StoreError>;

    /// Column names of `table` in storage order.
    async fn read_header(&self, table: &str) -> Result<Vec<String>, StoreError>;

    async fn write_row(&self, table: &str, index: usize, values: Row) -> Result<(), StoreError>;

    async fn append_row(&self, table: &str, values: Row) -> Result<(), StoreError>;

    /// Removes the row at `index`; later rows shift down by one.
    async fn delete_row(&self, table: &str, index: usize) -> Result<(), StoreError>;

    /// Opens a transaction scope. Stores without real transactions may treat
    /// this as a no-op, so callers must not rely on rollback for correctness.
    async fn begin(&self) -> Result<(), StoreError>;

    async fn commit(&self) -> Result<(), StoreError>;

    async fn rollback(&self) -> Result<(), StoreError>;
}

/// Runs `work` inside a transaction scope on `store`.
///
/// Commits when `work` succeeds. On failure the scope is rolled back and the
/// original error returned; a rollback failure is logged, not surfaced, so
/// the caller sees what actually went wrong first.
pub async fn with_transaction<'a, T, E>(
    store: &(dyn RowStore + 'a),
    work: BoxFuture<'a, Result<T, E>>,
) -> Result<T, E>
where
    E: From<StoreError> + std::fmt::Display,
{
    store.begin().await?;

    match work.await {
        Ok(value) => {
            store.commit().await?;
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "Rolling back transaction");
            if let Err(rollback_err) = store.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
