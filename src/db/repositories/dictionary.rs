use super::layout::TableLayout;
use crate::constants::{LIST_DELIMITER, LIST_JOINER, columns};
use crate::dictionary::{CanonicalDictionary, DictionaryDomain, DictionaryEntry};
use crate::error::Result;
use crate::store::RowStore;
use std::sync::Arc;
use tracing::info;

/// Reads dictionaries stored as `canonical_name, category, aliases` tables.
pub struct DictionaryRepository {
    store: Arc<dyn RowStore>,
}

impl DictionaryRepository {
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    async fn layout(&self, domain: DictionaryDomain) -> Result<TableLayout> {
        TableLayout::load(self.store.as_ref(), domain.table(), columns::DICTIONARY).await
    }

    pub async fn entries(&self, domain: DictionaryDomain) -> Result<Vec<DictionaryEntry>> {
        let layout = self.layout(domain).await?;
        let rows = self.store.read_all(domain.table()).await?;

        Ok(rows
            .iter()
            .filter(|row| !layout.get(row, "canonical_name").is_empty())
            .map(|row| DictionaryEntry {
                canonical_name: layout.get(row, "canonical_name").to_string(),
                category: Some(layout.get(row, "category"))
                    .filter(|c| !c.is_empty())
                    .map(ToString::to_string),
                aliases: layout
                    .get(row, "aliases")
                    .split(LIST_DELIMITER)
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect())
    }

    /// Builds the dictionary for `domain`, validating alias disjointness.
    pub async fn load(&self, domain: DictionaryDomain) -> Result<CanonicalDictionary> {
        let entries = self.entries(domain).await?;
        let dictionary = CanonicalDictionary::new(domain, entries)?;
        info!(domain = %domain, entries = dictionary.len(), "Loaded dictionary");
        Ok(dictionary)
    }

    /// Writes `entries` into an empty dictionary table. Returns `false`
    /// without writing when the table already has rows.
    pub async fn seed_if_empty(
        &self,
        domain: DictionaryDomain,
        entries: &[DictionaryEntry],
    ) -> Result<bool> {
        let layout = self.layout(domain).await?;
        if !self.store.read_all(domain.table()).await?.is_empty() {
            return Ok(false);
        }

        for entry in entries {
            let mut row = layout.blank_row();
            layout.set(&mut row, "canonical_name", entry.canonical_name.clone());
            layout.set(&mut row, "category", entry.category.clone().unwrap_or_default());
            layout.set(&mut row, "aliases", entry.aliases.join(LIST_JOINER));
            self.store.append_row(domain.table(), row).await?;
        }

        info!(domain = %domain, entries = entries.len(), "Seeded dictionary table");
        Ok(true)
    }
}
