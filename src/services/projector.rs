//! Derives the `key_creatives` summary of a show from its team rows.

use crate::constants::LIST_JOINER;
use crate::db::repositories::{ShowRepository, TeamRepository};
use crate::domain::ShowId;
use crate::error::{CatalogError, Result};
use crate::models::TeamMember;
use std::sync::Arc;
use tracing::debug;

/// Renders members as `Name (Role, Role)` sorted by order, or `sentinel`
/// when there are none. Equal orders keep their given sequence.
#[must_use]
pub fn render_key_creatives(members: &[TeamMember], sentinel: &str) -> String {
    if members.is_empty() {
        return sentinel.to_string();
    }

    let mut sorted: Vec<&TeamMember> = members.iter().collect();
    sorted.sort_by_key(|m| m.order);

    sorted
        .iter()
        .map(|m| m.render())
        .collect::<Vec<_>>()
        .join(LIST_JOINER)
}

pub struct KeyCreativesProjector {
    shows: Arc<ShowRepository>,
    team: Arc<TeamRepository>,
    sentinel: String,
}

impl KeyCreativesProjector {
    #[must_use]
    pub fn new(shows: Arc<ShowRepository>, team: Arc<TeamRepository>, sentinel: String) -> Self {
        Self {
            shows,
            team,
            sentinel,
        }
    }

    pub async fn project(&self, show_id: ShowId) -> Result<String> {
        let members = self.team.list_for_show(show_id).await?;
        Ok(render_key_creatives(&members, &self.sentinel))
    }

    /// Recomputes and stores the summary. Returns `true` when the stored
    /// value changed.
    pub async fn sync(&self, show_id: ShowId) -> Result<bool> {
        let stored = self.shows.get(show_id).await?.key_creatives;
        let projected = self.project(show_id).await?;
        if stored == projected {
            return Ok(false);
        }

        self.shows.write_key_creatives(show_id, &projected).await?;
        debug!(show = %show_id, key_creatives = %projected, "Projected key creatives");
        Ok(true)
    }

    pub async fn verify(&self, show_id: ShowId) -> Result<()> {
        let stored = self.shows.get(show_id).await?.key_creatives;
        let expected = self.project(show_id).await?;
        if stored == expected {
            Ok(())
        } else {
            Err(CatalogError::SyncInconsistency {
                show: show_id,
                stored,
                expected,
            })
        }
    }
}
