//! Maps free-text input to canonical names.
//!
//! Resolution never fails: text that matches nothing comes back as
//! [`ResolvedName::Unresolved`] carrying the original spelling. Studios
//! surface that as an `Other: <text>` marker; roles keep the text verbatim.

use super::{CanonicalDictionary, DictionaryDomain, normalize_key};
use crate::constants::{LIST_DELIMITER, OTHER_PREFIX};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ResolvedName {
    Canonical(String),
    Unresolved(String),
}

impl ResolvedName {
    /// The canonical name, or the original text when unresolved.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Canonical(v) | Self::Unresolved(v) => v,
        }
    }

    #[must_use]
    pub const fn is_canonical(&self) -> bool {
        matches!(self, Self::Canonical(_))
    }

    /// Stored form of a studio: canonical name or `Other: <original>`.
    #[must_use]
    pub fn into_studio_label(self) -> String {
        match self {
            Self::Canonical(v) => v,
            Self::Unresolved(v) => format!("{OTHER_PREFIX}{v}"),
        }
    }

    /// Stored form of a role: canonical name or the original text.
    #[must_use]
    pub fn into_role_label(self) -> String {
        match self {
            Self::Canonical(v) | Self::Unresolved(v) => v,
        }
    }
}

/// Resolves a single value against `dictionary`.
///
/// ```
/// # use showtrack::dictionary::{builtin, resolve, ResolvedName};
/// let studios = builtin::studios();
/// assert_eq!(
///     resolve(&studios, "20th Century Fox TV"),
///     ResolvedName::Canonical("20th Television".to_string())
/// );
/// ```
#[must_use]
pub fn resolve(dictionary: &CanonicalDictionary, input: &str) -> ResolvedName {
    let original = input.trim();

    if let Some(entry) = dictionary.find_canonical(original) {
        return ResolvedName::Canonical(entry.canonical_name.clone());
    }

    if let Some(entry) = dictionary.find_alias(original) {
        debug!(
            domain = %dictionary.domain(),
            input = original,
            canonical = %entry.canonical_name,
            "Resolved alias"
        );
        return ResolvedName::Canonical(entry.canonical_name.clone());
    }

    ResolvedName::Unresolved(original.to_string())
}

/// Splits `input` on commas and resolves each non-blank segment, keeping
/// input order.
#[must_use]
pub fn resolve_many(dictionary: &CanonicalDictionary, input: &str) -> Vec<ResolvedName> {
    input
        .split(LIST_DELIMITER)
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| resolve(dictionary, segment))
        .collect()
}

/// Resolver over both dictionaries, shared by the repositories.
#[derive(Debug, Clone)]
pub struct NameResolver {
    studios: Arc<CanonicalDictionary>,
    roles: Arc<CanonicalDictionary>,
}

impl NameResolver {
    #[must_use]
    pub fn new(studios: CanonicalDictionary, roles: CanonicalDictionary) -> Self {
        debug_assert_eq!(studios.domain(), DictionaryDomain::Studios);
        debug_assert_eq!(roles.domain(), DictionaryDomain::Roles);
        Self {
            studios: Arc::new(studios),
            roles: Arc::new(roles),
        }
    }

    /// Resolver over the built-in reference lists.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(super::builtin::studios(), super::builtin::roles())
    }

    #[must_use]
    pub fn studios(&self) -> &CanonicalDictionary {
        &self.studios
    }

    #[must_use]
    pub fn roles(&self) -> &CanonicalDictionary {
        &self.roles
    }

    /// Resolves one studio value to its stored label.
    ///
    /// A value already carrying the `Other:` marker is unwrapped and
    /// resolved again, so stored labels round-trip unchanged and an alias
    /// added later upgrades the marker to the canonical name.
    #[must_use]
    pub fn studio_label(&self, input: &str) -> String {
        let trimmed = input.trim();
        let inner = strip_other_prefix(trimmed).unwrap_or(trimmed);
        if inner.is_empty() {
            return String::new();
        }
        resolve(&self.studios, inner).into_studio_label()
    }

    /// Resolution preview for a comma-joined studio list, matching what
    /// [`Self::studio_labels`] would store: `Other:` markers are unwrapped
    /// before lookup.
    #[must_use]
    pub fn preview_studios(&self, input: &str) -> Vec<ResolvedName> {
        split_segments(&[input])
            .map(|segment| strip_other_prefix(segment).unwrap_or(segment))
            .filter(|segment| !segment.is_empty())
            .map(|segment| resolve(&self.studios, segment))
            .collect()
    }

    #[must_use]
    pub fn preview_roles(&self, input: &str) -> Vec<ResolvedName> {
        resolve_many(&self.roles, input)
    }

    #[must_use]
    pub fn role_label(&self, input: &str) -> String {
        resolve(&self.roles, input).into_role_label()
    }

    /// Resolves a list of studio inputs, each of which may itself be a
    /// comma-joined list. Blank segments are dropped and repeats collapsed.
    #[must_use]
    pub fn studio_labels<S: AsRef<str>>(&self, inputs: &[S]) -> Vec<String> {
        dedup_labels(
            split_segments(inputs)
                .map(|segment| self.studio_label(segment))
                .collect(),
        )
    }

    #[must_use]
    pub fn role_labels<S: AsRef<str>>(&self, inputs: &[S]) -> Vec<String> {
        dedup_labels(
            split_segments(inputs)
                .map(|segment| self.role_label(segment))
                .collect(),
        )
    }
}

fn strip_other_prefix(value: &str) -> Option<&str> {
    let marker = OTHER_PREFIX.trim_end();
    let head = value.get(..marker.len())?;
    if head.eq_ignore_ascii_case(marker) {
        Some(value[marker.len()..].trim())
    } else {
        None
    }
}

fn split_segments<S: AsRef<str>>(inputs: &[S]) -> impl Iterator<Item = &str> {
    inputs
        .iter()
        .flat_map(|input| input.as_ref().split(LIST_DELIMITER))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|label| !label.is_empty() && seen.insert(normalize_key(label)))
        .collect()
}
