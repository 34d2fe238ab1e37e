use super::layout::TableLayout;
use crate::constants::{LIST_DELIMITER, LIST_JOINER, columns, tables};
use crate::dictionary::NameResolver;
use crate::domain::ShowId;
use crate::error::{CatalogError, Result};
use crate::models::show::{
    clean_optional, format_announcement_date, parse_announcement_date, require_text,
};
use crate::models::{Show, ShowDraft, ShowPatch};
use crate::services::search::SearchIndex;
use crate::store::{Row, RowStore};
use std::sync::Arc;
use tracing::{info, warn};

const TABLE: &str = tables::SHOWS;

/// Show records in the `shows` table.
///
/// Rows are located by their `id` cell on every call; positions are never
/// cached, so a concurrent delete elsewhere cannot make us overwrite the
/// wrong row within one serialized operation.
pub struct ShowRepository {
    store: Arc<dyn RowStore>,
    resolver: Arc<NameResolver>,
    search: SearchIndex,
}

impl ShowRepository {
    #[must_use]
    pub fn new(store: Arc<dyn RowStore>, resolver: Arc<NameResolver>, search: SearchIndex) -> Self {
        Self {
            store,
            resolver,
            search,
        }
    }

    async fn layout(&self) -> Result<TableLayout> {
        TableLayout::load(self.store.as_ref(), TABLE, columns::SHOWS).await
    }

    fn row_to_show(layout: &TableLayout, row: &Row, position: usize) -> Result<Show> {
        let id = layout.get(row, "id").parse::<ShowId>().map_err(|_| {
            CatalogError::schema(TABLE, format!("row {position} has an invalid id"))
        })?;

        let episode_count = match layout.get(row, "episode_count") {
            "" => None,
            raw => raw.parse::<u32>().map_or_else(
                |_| {
                    warn!(show = %id, value = raw, "Ignoring unparsable episode count");
                    None
                },
                Some,
            ),
        };

        let announcement_date = match layout.get(row, "announcement_date") {
            "" => None,
            raw => parse_announcement_date(raw).unwrap_or_else(|_| {
                warn!(show = %id, value = raw, "Ignoring unparsable announcement date");
                None
            }),
        };

        let text = |column: &str| clean_optional(Some(layout.get(row, column).to_string()));

        Ok(Show {
            id,
            title: layout.get(row, "title").to_string(),
            network: layout.get(row, "network").to_string(),
            studios: split_list(layout.get(row, "studios")),
            genre: text("genre"),
            subgenre: text("subgenre"),
            episode_count,
            source_type: text("source_type"),
            status: text("status"),
            order_type: text("order_type"),
            announcement_date,
            notes: text("notes"),
            key_creatives: layout.get(row, "key_creatives").to_string(),
        })
    }

    fn show_to_row(layout: &TableLayout, show: &Show, base: Option<Row>) -> Row {
        let mut row = base.unwrap_or_else(|| layout.blank_row());
        let opt = |value: &Option<String>| value.clone().unwrap_or_default();

        layout.set(&mut row, "id", show.id.to_string());
        layout.set(&mut row, "title", show.title.clone());
        layout.set(&mut row, "network", show.network.clone());
        layout.set(&mut row, "studios", show.studios.join(LIST_JOINER));
        layout.set(&mut row, "genre", opt(&show.genre));
        layout.set(&mut row, "subgenre", opt(&show.subgenre));
        layout.set(
            &mut row,
            "episode_count",
            show.episode_count.map(|c| c.to_string()).unwrap_or_default(),
        );
        layout.set(&mut row, "source_type", opt(&show.source_type));
        layout.set(&mut row, "status", opt(&show.status));
        layout.set(&mut row, "order_type", opt(&show.order_type));
        layout.set(
            &mut row,
            "announcement_date",
            show.announcement_date
                .map(format_announcement_date)
                .unwrap_or_default(),
        );
        layout.set(&mut row, "notes", opt(&show.notes));
        layout.set(&mut row, "key_creatives", show.key_creatives.clone());
        row
    }

    async fn load(&self) -> Result<(TableLayout, Vec<Row>)> {
        let layout = self.layout().await?;
        let rows = self.store.read_all(TABLE).await?;
        Ok((layout, rows))
    }

    /// Layout, storage position, and raw row of the show with `id`.
    async fn locate(&self, id: ShowId) -> Result<(TableLayout, usize, Row)> {
        let (layout, rows) = self.load().await?;
        let key = id.to_string();

        rows.into_iter()
            .enumerate()
            .find(|(_, row)| layout.get(row, "id").eq_ignore_ascii_case(&key))
            .map(|(position, row)| (layout, position, row))
            .ok_or_else(|| CatalogError::show_not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Show>> {
        let (layout, rows) = self.load().await?;
        rows.iter()
            .enumerate()
            .filter(|(_, row)| !layout.get(row, "id").is_empty())
            .map(|(position, row)| Self::row_to_show(&layout, row, position))
            .collect()
    }

    pub async fn get(&self, id: ShowId) -> Result<Show> {
        let (layout, position, row) = self.locate(id).await?;
        Self::row_to_show(&layout, &row, position)
    }

    /// Case-insensitive title lookup.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Show>> {
        let wanted = title_key(title);
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|show| title_key(&show.title) == wanted))
    }

    async fn ensure_title_available(&self, title: &str, except: Option<ShowId>) -> Result<()> {
        if let Some(existing) = self.find_by_title(title).await?
            && Some(existing.id) != except
        {
            return Err(CatalogError::validation(format!(
                "A show titled '{}' already exists",
                existing.title
            )));
        }
        Ok(())
    }

    /// Validates and resolves `draft`, then appends it with an empty
    /// key creatives placeholder. The team in the draft is not touched here.
    pub async fn create(&self, draft: &ShowDraft) -> Result<Show> {
        let title = require_text("title", &draft.title)?;
        let network = require_text("network", &draft.network)?;
        let studios = self.resolver.studio_labels(&draft.studios);
        if studios.is_empty() {
            return Err(CatalogError::validation("At least one studio is required"));
        }
        let announcement_date = match &draft.announcement_date {
            Some(raw) => parse_announcement_date(raw)?,
            None => None,
        };

        self.ensure_title_available(&title, None).await?;

        let show = Show {
            id: ShowId::new(),
            title,
            network,
            studios,
            genre: clean_optional(draft.genre.clone()),
            subgenre: clean_optional(draft.subgenre.clone()),
            episode_count: draft.episode_count,
            source_type: clean_optional(draft.source_type.clone()),
            status: clean_optional(draft.status.clone()),
            order_type: clean_optional(draft.order_type.clone()),
            announcement_date,
            notes: clean_optional(draft.notes.clone()),
            key_creatives: String::new(),
        };

        let layout = self.layout().await?;
        self.store
            .append_row(TABLE, Self::show_to_row(&layout, &show, None))
            .await?;

        info!(show = %show.id, title = %show.title, "Created show");
        Ok(show)
    }

    /// Applies the record fields of `patch`. Title and team are ignored here:
    /// titles go through [`ShowRepository::rename`], teams through the team
    /// repository.
    pub async fn update(&self, id: ShowId, patch: &ShowPatch) -> Result<Show> {
        let (layout, position, row) = self.locate(id).await?;
        let mut show = Self::row_to_show(&layout, &row, position)?;

        if !patch.touches_show_record() {
            return Ok(show);
        }

        if let Some(network) = &patch.network {
            show.network = require_text("network", network)?;
        }
        if let Some(studios) = &patch.studios {
            let resolved = self.resolver.studio_labels(studios);
            if resolved.is_empty() {
                return Err(CatalogError::validation("At least one studio is required"));
            }
            show.studios = resolved;
        }
        if let Some(raw) = &patch.announcement_date {
            show.announcement_date = parse_announcement_date(raw)?;
        }
        if let Some(count) = patch.episode_count {
            show.episode_count = count;
        }
        patch_text(&mut show.genre, patch.genre.as_ref());
        patch_text(&mut show.subgenre, patch.subgenre.as_ref());
        patch_text(&mut show.source_type, patch.source_type.as_ref());
        patch_text(&mut show.status, patch.status.as_ref());
        patch_text(&mut show.order_type, patch.order_type.as_ref());
        patch_text(&mut show.notes, patch.notes.as_ref());

        self.store
            .write_row(TABLE, position, Self::show_to_row(&layout, &show, Some(row)))
            .await?;

        info!(show = %id, "Updated show");
        Ok(show)
    }

    /// Changes the display title. Team rows reference the id, so nothing
    /// else needs rewriting.
    pub async fn rename(&self, id: ShowId, new_title: &str) -> Result<Show> {
        let title = require_text("title", new_title)?;
        let (layout, position, row) = self.locate(id).await?;
        let mut show = Self::row_to_show(&layout, &row, position)?;

        if show.title == title {
            return Ok(show);
        }
        self.ensure_title_available(&title, Some(id)).await?;

        let old_title = std::mem::replace(&mut show.title, title);
        self.store
            .write_row(TABLE, position, Self::show_to_row(&layout, &show, Some(row)))
            .await?;

        info!(show = %id, from = %old_title, to = %show.title, "Renamed show");
        Ok(show)
    }

    /// Stores a projected key creatives value. Only the projector calls this.
    pub(crate) async fn write_key_creatives(&self, id: ShowId, text: &str) -> Result<()> {
        let (layout, position, mut row) = self.locate(id).await?;
        if layout.get(&row, "key_creatives") == text {
            return Ok(());
        }
        layout.set(&mut row, "key_creatives", text.to_string());
        self.store.write_row(TABLE, position, row).await?;
        Ok(())
    }

    pub async fn delete(&self, id: ShowId) -> Result<()> {
        let (_, position, _) = self.locate(id).await?;
        self.store.delete_row(TABLE, position).await?;
        info!(show = %id, "Deleted show");
        Ok(())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Show>> {
        Ok(self.search.search(self.list().await?, query))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

fn patch_text(field: &mut Option<String>, update: Option<&String>) {
    if let Some(value) = update {
        *field = clean_optional(Some(value.clone()));
    }
}
