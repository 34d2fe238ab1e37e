use crate::error::{CatalogError, Result};
use crate::store::{Row, RowStore};
use std::collections::HashMap;

/// Column positions of one table, resolved from its stored header.
///
/// Repositories address cells by column name so a table whose columns were
/// reordered, or which carries extra columns, keeps working. Extra columns
/// are carried through untouched on overwrite.
#[derive(Debug, Clone)]
pub struct TableLayout {
    table: &'static str,
    width: usize,
    indices: HashMap<&'static str, usize>,
}

impl TableLayout {
    /// Reads the header of `table` and checks every `required` column is
    /// present.
    pub async fn load(
        store: &dyn RowStore,
        table: &'static str,
        required: &[&'static str],
    ) -> Result<Self> {
        let header = store.read_header(table).await?;
        Self::from_header(table, &header, required)
    }

    pub fn from_header(
        table: &'static str,
        header: &[String],
        required: &[&'static str],
    ) -> Result<Self> {
        let mut indices = HashMap::with_capacity(required.len());

        for &column in required {
            let idx = header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| {
                    CatalogError::schema(table, format!("missing column '{column}'"))
                })?;
            indices.insert(column, idx);
        }

        Ok(Self {
            table,
            width: header.len(),
            indices,
        })
    }

    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// Cell text for `column`; short rows read as empty.
    #[must_use]
    pub fn get<'r>(&self, row: &'r Row, column: &str) -> &'r str {
        self.indices
            .get(column)
            .and_then(|&idx| row.get(idx))
            .map_or("", |cell| cell.trim())
    }

    pub fn set(&self, row: &mut Row, column: &str, value: String) {
        if let Some(&idx) = self.indices.get(column) {
            if row.len() < self.width {
                row.resize(self.width, String::new());
            }
            row[idx] = value;
        }
    }

    #[must_use]
    pub fn blank_row(&self) -> Row {
        vec![String::new(); self.width]
    }
}
