//! Domain primitives for the show catalog.
//!
//! Shows are identified by a stable surrogate key rather than their row
//! position or display title, so renames and row shifts never break the
//! link between a show and its team.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a show record.
///
/// # Examples
///
/// ```rust
/// use showtrack::domain::ShowId;
///
/// let id = ShowId::new();
/// let parsed: ShowId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowId(Uuid);

impl ShowId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ShowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShowId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl From<Uuid> for ShowId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// How a caller points at a show.
///
/// `Title` exists for callers that only know the display title (legacy
/// forms); it is looked up case-insensitively and converted to an id before
/// any team table access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowRef {
    Id(ShowId),
    Title(String),
}

impl ShowRef {
    /// Parses CLI/form input: a UUID becomes an id reference, anything else a
    /// title reference.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        input
            .parse::<ShowId>()
            .map_or_else(|_| Self::Title(input.trim().to_string()), Self::Id)
    }
}

impl From<ShowId> for ShowRef {
    fn from(id: ShowId) -> Self {
        Self::Id(id)
    }
}

impl fmt::Display for ShowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Title(title) => write!(f, "'{title}'"),
        }
    }
}

/// Step of a multi-step catalog operation, reported when the operation
/// aborts so the caller can judge what was left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStep {
    ValidateInput,
    WriteShow,
    SyncTeam,
    ProjectKeyCreatives,
    DeleteShow,
}

impl SyncStep {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidateInput => "input validation",
            Self::WriteShow => "show record write",
            Self::SyncTeam => "team sync",
            Self::ProjectKeyCreatives => "key creatives projection",
            Self::DeleteShow => "show deletion",
        }
    }
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
