use crate::constants::LIST_JOINER;
use crate::dictionary::normalize_key;
use crate::domain::ShowId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub show_id: ShowId,
    pub name: String,
    pub roles: Vec<String>,
    pub order: i32,
    pub notes: Option<String>,
}

impl TeamMember {
    /// Case-insensitive name comparison used for uniqueness within a show.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        let key = normalize_key(role);
        self.roles.iter().any(|r| normalize_key(r) == key)
    }

    /// `Name` or `Name (Role A, Role B)`.
    #[must_use]
    pub fn render(&self) -> String {
        if self.roles.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.roles.join(LIST_JOINER))
        }
    }
}

/// Team member as submitted by a form, before role resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMemberInput {
    pub name: String,
    /// Each entry may itself be a comma-joined list.
    pub roles: Vec<String>,
    /// Display priority; defaults to the 1-based list position.
    pub order: Option<i32>,
    pub notes: Option<String>,
}

impl TeamMemberInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_roles(mut self, roles: &[&str]) -> Self {
        self.roles = roles.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub const fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
