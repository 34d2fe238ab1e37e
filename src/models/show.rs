use crate::constants::DATE_FORMAT;
use crate::domain::ShowId;
use crate::error::{CatalogError, Result};
use crate::models::team::TeamMemberInput;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub title: String,
    pub network: String,
    pub studios: Vec<String>,
    pub genre: Option<String>,
    pub subgenre: Option<String>,
    pub episode_count: Option<u32>,
    pub source_type: Option<String>,
    pub status: Option<String>,
    pub order_type: Option<String>,
    pub announcement_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Rendered summary of the team table. Written only by the projector.
    pub key_creatives: String,
}

impl Show {
    /// Fields the search index matches against, in a fixed order.
    #[must_use]
    pub fn searchable_fields(&self) -> [String; 5] {
        [
            self.title.clone(),
            self.network.clone(),
            self.studios.join(crate::constants::LIST_JOINER),
            self.genre.clone().unwrap_or_default(),
            self.status.clone().unwrap_or_default(),
        ]
    }
}

/// Form data for a show that has not been persisted yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowDraft {
    pub title: String,
    pub network: String,
    pub studios: Vec<String>,
    pub genre: Option<String>,
    pub subgenre: Option<String>,
    pub episode_count: Option<u32>,
    pub source_type: Option<String>,
    pub status: Option<String>,
    pub order_type: Option<String>,
    /// `YYYY/MM/DD` (or `YYYY-MM-DD`).
    pub announcement_date: Option<String>,
    pub notes: Option<String>,
    pub team: Vec<TeamMemberInput>,
}

impl ShowDraft {
    pub fn new(title: impl Into<String>, network: impl Into<String>, studios: &[&str]) -> Self {
        Self {
            title: title.into(),
            network: network.into(),
            studios: studios.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_team(mut self, team: Vec<TeamMemberInput>) -> Self {
        self.team = team;
        self
    }
}

/// Partial update of a persisted show.
///
/// `None` leaves a field untouched. For optional text fields an empty
/// string clears the value. There is deliberately no `key_creatives` field:
/// it cannot be set from outside, and a serialized patch carrying one is
/// ignored on deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowPatch {
    pub title: Option<String>,
    pub network: Option<String>,
    pub studios: Option<Vec<String>>,
    pub genre: Option<String>,
    pub subgenre: Option<String>,
    pub episode_count: Option<Option<u32>>,
    pub source_type: Option<String>,
    pub status: Option<String>,
    pub order_type: Option<String>,
    pub announcement_date: Option<String>,
    pub notes: Option<String>,
    /// Replaces the whole team when present; `Some(vec![])` clears it.
    pub team: Option<Vec<TeamMemberInput>>,
}

impl ShowPatch {
    #[must_use]
    pub fn touches_show_record(&self) -> bool {
        self.network.is_some()
            || self.studios.is_some()
            || self.genre.is_some()
            || self.subgenre.is_some()
            || self.episode_count.is_some()
            || self.source_type.is_some()
            || self.status.is_some()
            || self.order_type.is_some()
            || self.announcement_date.is_some()
            || self.notes.is_some()
    }
}

/// Trims optional text, mapping blank to `None`.
#[must_use]
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims required text, failing when blank.
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Parses a form date. Blank input means "no date".
pub fn parse_announcement_date(value: &str) -> Result<Option<NaiveDate>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map(Some)
        .map_err(|_| {
            CatalogError::validation(format!(
                "Invalid announcement date '{trimmed}'. Expected YYYY/MM/DD"
            ))
        })
}

#[must_use]
pub fn format_announcement_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_date_spellings() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_announcement_date("2024/03/09").unwrap(), expected);
        assert_eq!(parse_announcement_date("2024-03-09").unwrap(), expected);
        assert_eq!(parse_announcement_date("  ").unwrap(), None);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_announcement_date("March 9th").is_err());
        assert!(parse_announcement_date("2024/13/01").is_err());
    }

    #[test]
    fn formats_with_slashes() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 2).unwrap();
        assert_eq!(format_announcement_date(date), "2023/11/02");
    }

    #[test]
    fn patch_ignores_key_creatives_from_json() {
        let patch: ShowPatch =
            serde_json::from_str(r#"{"network":"HBO","key_creatives":"Hacked (Writer)"}"#)
                .unwrap();
        assert_eq!(patch.network.as_deref(), Some("HBO"));
        assert!(patch.touches_show_record());
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("title", "  Severance ").unwrap(), "Severance");
        assert!(require_text("network", "   ").is_err());
    }
}
