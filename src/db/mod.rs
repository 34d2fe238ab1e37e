//! SQLite-backed [`RowStore`].
//!
//! Logical tables live in two physical ones: `sheet_headers` holds each
//! table's column names, `sheet_rows` holds the rows with a dense 0-based
//! `position`. Cells are stored as a JSON array of strings.

use crate::entities::prelude::*;
use crate::entities::{sheet_headers, sheet_rows};
use crate::store::{Row, RowStore, StoreError};
use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement,
    TransactionTrait,
};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub mod migrator;
pub mod repositories;

pub struct SqlRowStore {
    conn: DatabaseConnection,
    /// Open transaction, if any. While set, every call runs on it.
    txn: Mutex<Option<DatabaseTransaction>>,
}

impl SqlRowStore {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self {
            conn,
            txn: Mutex::new(None),
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Creates or replaces the header of `table`. Existing rows are kept.
    pub async fn define_table(&self, table: &str, header: &[&str]) -> Result<(), StoreError> {
        let guard = self.txn.lock().await;
        match guard.as_ref() {
            Some(txn) => define_table_on(txn, table, header).await,
            None => define_table_on(&self.conn, table, header).await,
        }
    }
}

fn position_of(index: usize) -> Result<i32, StoreError> {
    i32::try_from(index).map_err(|_| StoreError::Backend(format!("Row index {index} too large")))
}

async fn define_table_on<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    header: &[&str],
) -> Result<(), StoreError> {
    let columns = serde_json::to_string(header)?;
    match SheetHeaders::find_by_id(table.to_string()).one(conn).await? {
        Some(existing) => {
            let mut active: sheet_headers::ActiveModel = existing.into();
            active.columns = Set(columns);
            active.update(conn).await?;
        }
        None => {
            sheet_headers::ActiveModel {
                table_name: Set(table.to_string()),
                columns: Set(columns),
            }
            .insert(conn)
            .await?;
        }
    }
    Ok(())
}

async fn header_on<C: ConnectionTrait>(conn: &C, table: &str) -> Result<Vec<String>, StoreError> {
    let header = SheetHeaders::find_by_id(table.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| StoreError::MissingTable(table.to_string()))?;
    Ok(serde_json::from_str(&header.columns)?)
}

async fn row_at<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    index: usize,
) -> Result<sheet_rows::Model, StoreError> {
    header_on(conn, table).await?;
    SheetRows::find()
        .filter(sheet_rows::Column::TableName.eq(table))
        .filter(sheet_rows::Column::Position.eq(position_of(index)?))
        .one(conn)
        .await?
        .ok_or_else(|| StoreError::RowOutOfRange {
            table: table.to_string(),
            index,
        })
}

async fn read_all_on<C: ConnectionTrait>(conn: &C, table: &str) -> Result<Vec<Row>, StoreError> {
    header_on(conn, table).await?;
    let rows = SheetRows::find()
        .filter(sheet_rows::Column::TableName.eq(table))
        .order_by_asc(sheet_rows::Column::Position)
        .all(conn)
        .await?;

    rows.iter()
        .map(|row| serde_json::from_str(&row.cells).map_err(StoreError::from))
        .collect()
}

async fn write_row_on<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    index: usize,
    values: Row,
) -> Result<(), StoreError> {
    let existing = row_at(conn, table, index).await?;
    let mut active: sheet_rows::ActiveModel = existing.into();
    active.cells = Set(serde_json::to_string(&values)?);
    active.update(conn).await?;
    Ok(())
}

async fn append_row_on<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    values: Row,
) -> Result<(), StoreError> {
    header_on(conn, table).await?;
    let count = SheetRows::find()
        .filter(sheet_rows::Column::TableName.eq(table))
        .count(conn)
        .await?;
    let position = i32::try_from(count)
        .map_err(|_| StoreError::Backend(format!("Table '{table}' is full")))?;

    sheet_rows::ActiveModel {
        table_name: Set(table.to_string()),
        position: Set(position),
        cells: Set(serde_json::to_string(&values)?),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}

async fn delete_row_on<C: ConnectionTrait>(
    conn: &C,
    table: &str,
    index: usize,
) -> Result<(), StoreError> {
    let existing = row_at(conn, table, index).await?;
    SheetRows::delete_by_id(existing.id).exec(conn).await?;

    SheetRows::update_many()
        .col_expr(
            sheet_rows::Column::Position,
            Expr::col(sheet_rows::Column::Position).sub(1),
        )
        .filter(sheet_rows::Column::TableName.eq(table))
        .filter(sheet_rows::Column::Position.gt(existing.position))
        .exec(conn)
        .await?;
    Ok(())
}

#[async_trait::async_trait]
impl RowStore for SqlRowStore {
    async fn read_all(&self, table: &str) -> Result<Vec<Row>, StoreError> {
        let guard = self.txn.lock().await;
        match guard.as_ref() {
            Some(txn) => read_all_on(txn, table).await,
            None => read_all_on(&self.conn, table).await,
        }
    }

    async fn read_header(&self, table: &str) -> Result<Vec<String>, StoreError> {
        let guard = self.txn.lock().await;
        match guard.as_ref() {
            Some(txn) => header_on(txn, table).await,
            None => header_on(&self.conn, table).await,
        }
    }

    async fn write_row(&self, table: &str, index: usize, values: Row) -> Result<(), StoreError> {
        let guard = self.txn.lock().await;
        match guard.as_ref() {
            Some(txn) => write_row_on(txn, table, index, values).await,
            None => write_row_on(&self.conn, table, index, values).await,
        }
    }

    async fn append_row(&self, table: &str, values: Row) -> Result<(), StoreError> {
        let guard = self.txn.lock().await;
        match guard.as_ref() {
            Some(txn) => append_row_on(txn, table, values).await,
            None => append_row_on(&self.conn, table, values).await,
        }
    }

    async fn delete_row(&self, table: &str, index: usize) -> Result<(), StoreError> {
        let guard = self.txn.lock().await;
        match guard.as_ref() {
            Some(txn) => delete_row_on(txn, table, index).await,
            None => delete_row_on(&self.conn, table, index).await,
        }
    }

    async fn begin(&self) -> Result<(), StoreError> {
        let mut guard = self.txn.lock().await;
        if guard.is_some() {
            return Err(StoreError::Transaction(
                "A transaction is already active".to_string(),
            ));
        }
        *guard = Some(self.conn.begin().await?);
        debug!("Began transaction");
        Ok(())
    }

    async fn commit(&self) -> Result<(), StoreError> {
        let txn = self
            .txn
            .lock()
            .await
            .take()
            .ok_or_else(|| StoreError::Transaction("No active transaction".to_string()))?;
        txn.commit().await?;
        debug!("Committed transaction");
        Ok(())
    }

    async fn rollback(&self) -> Result<(), StoreError> {
        let txn = self
            .txn
            .lock()
            .await
            .take()
            .ok_or_else(|| StoreError::Transaction("No active transaction".to_string()))?;
        txn.rollback().await?;
        debug!("Rolled back transaction");
        Ok(())
    }
}
