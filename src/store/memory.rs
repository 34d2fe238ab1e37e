//! In-process row store.
//!
//! Backs tests and dry runs. Transactions are real: `begin` snapshots every
//! table and `rollback` restores the snapshot.

use super::{Row, RowStore, StoreError};
use crate::constants::{columns, tables};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
struct Table {
    header: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, Table>,
    snapshot: Option<HashMap<String, Table>>,
    failing_tables: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct MemoryRowStore {
    state: Mutex<MemoryState>,
}

impl MemoryRowStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the four catalog tables created and empty.
    #[must_use]
    pub fn with_catalog_schema() -> Self {
        let mut state = MemoryState::default();
        for (name, header) in [
            (tables::SHOWS, columns::SHOWS),
            (tables::TEAM, columns::TEAM),
            (tables::STUDIOS, columns::DICTIONARY),
            (tables::ROLES, columns::DICTIONARY),
        ] {
            state.tables.insert(name.to_string(), Table::with_header(header));
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// Creates (or replaces) `table` with the given header and no rows.
    pub fn create_table(&self, table: &str, header: &[&str]) -> Result<(), StoreError> {
        self.lock()?
            .tables
            .insert(table.to_string(), Table::with_header(header));
        Ok(())
    }

    pub fn drop_table(&self, table: &str) -> Result<(), StoreError> {
        self.lock()?.tables.remove(table);
        Ok(())
    }

    /// Makes the next mutating call against `table` fail once. Used to
    /// exercise partial-failure paths.
    pub fn fail_next_write(&self, table: &str) -> Result<(), StoreError> {
        self.lock()?.failing_tables.insert(table.to_string());
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("Memory store lock poisoned".to_string()))
    }
}

impl Table {
    fn with_header(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }
}

impl MemoryState {
    fn table(&self, table: &str) -> Result<&Table, StoreError> {
        self.tables
            .get(table)
            .ok_or_else(|| StoreError::MissingTable(table.to_string()))
    }

    fn table_for_write(&mut self, table: &str) -> Result<&mut Table, StoreError> {
        if self.failing_tables.remove(table) {
            return Err(StoreError::WriteFailed {
                table: table.to_string(),
                message: "injected failure".to_string(),
            });
        }
        self.tables
            .get_mut(table)
            .ok_or_else(|| StoreError::MissingTable(table.to_string()))
    }
}

#[async_trait::async_trait]
impl RowStore for MemoryRowStore {
    async fn read_all(&self, table: &str) -> Result<Vec<Row>, StoreError> {
        Ok(self.lock()?.table(table)?.rows.clone())
    }

    async fn read_header(&self, table: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.table(table)?.header.clone())
    }

    async fn write_row(&self, table: &str, index: usize, values: Row) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let target = state.table_for_write(table)?;
        let row = target
            .rows
            .get_mut(index)
            .ok_or_else(|| StoreError::RowOutOfRange {
                table: table.to_string(),
                index,
            })?;
        *row = values;
        Ok(())
    }

    async fn append_row(&self, table: &str, values: Row) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.table_for_write(table)?.rows.push(values);
        Ok(())
    }

    async fn delete_row(&self, table: &str, index: usize) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let target = state.table_for_write(table)?;
        if index >= target.rows.len() {
            return Err(StoreError::RowOutOfRange {
                table: table.to_string(),
                index,
            });
        }
        target.rows.remove(index);
        Ok(())
    }

    async fn begin(&self) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.snapshot.is_some() {
            return Err(StoreError::Transaction(
                "A transaction is already active".to_string(),
            ));
        }
        state.snapshot = Some(state.tables.clone());
        Ok(())
    }

    async fn commit(&self) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state
            .snapshot
            .take()
            .map(|_| ())
            .ok_or_else(|| StoreError::Transaction("No active transaction".to_string()))
    }

    async fn rollback(&self) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let snapshot = state
            .snapshot
            .take()
            .ok_or_else(|| StoreError::Transaction("No active transaction".to_string()))?;
        state.tables = snapshot;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Row {
        values.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn delete_shifts_following_rows() {
        let store = MemoryRowStore::new();
        store.create_table("t", &["v"]).unwrap();
        for v in ["a", "b", "c"] {
            store.append_row("t", row(&[v])).await.unwrap();
        }

        store.delete_row("t", 1).await.unwrap();

        assert_eq!(
            store.read_all("t").await.unwrap(),
            vec![row(&["a"]), row(&["c"])]
        );
    }

    #[tokio::test]
    async fn out_of_range_write_is_rejected() {
        let store = MemoryRowStore::new();
        store.create_table("t", &["v"]).unwrap();

        let err = store.write_row("t", 0, row(&["x"])).await.unwrap_err();
        assert!(matches!(err, StoreError::RowOutOfRange { index: 0, .. }));
    }

    #[tokio::test]
    async fn missing_table_is_reported() {
        let store = MemoryRowStore::new();
        let err = store.read_header("nope").await.unwrap_err();
        assert_eq!(err.table(), Some("nope"));
    }

    #[tokio::test]
    async fn rollback_restores_snapshot() {
        let store = MemoryRowStore::new();
        store.create_table("t", &["v"]).unwrap();
        store.append_row("t", row(&["keep"])).await.unwrap();

        store.begin().await.unwrap();
        store.delete_row("t", 0).await.unwrap();
        store.append_row("t", row(&["temp"])).await.unwrap();
        store.rollback().await.unwrap();

        assert_eq!(store.read_all("t").await.unwrap(), vec![row(&["keep"])]);
    }

    #[tokio::test]
    async fn nested_begin_is_rejected() {
        let store = MemoryRowStore::new();
        store.begin().await.unwrap();
        assert!(matches!(
            store.begin().await,
            Err(StoreError::Transaction(_))
        ));
        store.commit().await.unwrap();
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let store = MemoryRowStore::new();
        store.create_table("t", &["v"]).unwrap();
        store.fail_next_write("t").unwrap();

        assert!(matches!(
            store.append_row("t", row(&["x"])).await,
            Err(StoreError::WriteFailed { .. })
        ));
        store.append_row("t", row(&["y"])).await.unwrap();
        assert_eq!(store.read_all("t").await.unwrap().len(), 1);
    }
}
