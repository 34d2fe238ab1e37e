//! Canonical name dictionaries for studios and roles.
//!
//! A dictionary maps every known spelling of an entity (its canonical name
//! plus aliases) to exactly one canonical label. Keys are compared after
//! [`normalize_key`], so case, periods, and stray whitespace never matter.

pub mod builtin;
pub mod resolver;

pub use resolver::{NameResolver, ResolvedName, resolve, resolve_many};

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryDomain {
    Studios,
    Roles,
}

impl DictionaryDomain {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Studios => "studios",
            Self::Roles => "roles",
        }
    }

    /// Table holding this dictionary in the row store.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Studios => crate::constants::tables::STUDIOS,
            Self::Roles => crate::constants::tables::ROLES,
        }
    }
}

impl fmt::Display for DictionaryDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub canonical_name: String,
    /// UI grouping (roles only). Passed through untouched.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl DictionaryEntry {
    pub fn new(canonical_name: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            category: None,
            aliases: aliases.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Comparison key for dictionary matching: trimmed, periods removed,
/// whitespace runs collapsed, lower-cased.
///
/// ```
/// # use showtrack::dictionary::normalize_key;
/// assert_eq!(normalize_key("  Warner Bros.  Television "), "warner bros television");
/// ```
#[must_use]
pub fn normalize_key(input: &str) -> String {
    input
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Immutable lookup table for one domain.
#[derive(Debug, Clone)]
pub struct CanonicalDictionary {
    domain: DictionaryDomain,
    entries: Vec<DictionaryEntry>,
    canonical_index: HashMap<String, usize>,
    alias_index: HashMap<String, usize>,
}

impl CanonicalDictionary {
    /// Builds a dictionary, rejecting any key that would map to two
    /// different canonical names.
    pub fn new(domain: DictionaryDomain, entries: Vec<DictionaryEntry>) -> Result<Self> {
        let mut canonical_index = HashMap::new();
        let mut alias_index = HashMap::new();
        let mut owner: HashMap<String, usize> = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            let canonical_key = normalize_key(&entry.canonical_name);
            if canonical_key.is_empty() {
                return Err(CatalogError::validation(format!(
                    "{domain} dictionary entry {} has an empty canonical name",
                    idx + 1
                )));
            }
            claim(&mut owner, &entries, domain, &canonical_key, idx)?;
            canonical_index.insert(canonical_key.clone(), idx);

            for alias in &entry.aliases {
                let key = normalize_key(alias);
                if key.is_empty() || key == canonical_key {
                    continue;
                }
                claim(&mut owner, &entries, domain, &key, idx)?;
                alias_index.insert(key, idx);
            }
        }

        Ok(Self {
            domain,
            entries,
            canonical_index,
            alias_index,
        })
    }

    /// A dictionary with no entries; every input resolves as unresolved.
    #[must_use]
    pub fn empty(domain: DictionaryDomain) -> Self {
        Self {
            domain,
            entries: Vec::new(),
            canonical_index: HashMap::new(),
            alias_index: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn domain(&self) -> DictionaryDomain {
        self.domain
    }

    #[must_use]
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry whose canonical name matches `input`.
    #[must_use]
    pub fn find_canonical(&self, input: &str) -> Option<&DictionaryEntry> {
        self.canonical_index
            .get(&normalize_key(input))
            .map(|&idx| &self.entries[idx])
    }

    /// Entry owning the alias `input`.
    #[must_use]
    pub fn find_alias(&self, input: &str) -> Option<&DictionaryEntry> {
        self.alias_index
            .get(&normalize_key(input))
            .map(|&idx| &self.entries[idx])
    }

    #[must_use]
    pub fn category_of(&self, canonical_name: &str) -> Option<&str> {
        self.find_canonical(canonical_name)
            .and_then(|e| e.category.as_deref())
    }
}

fn claim(
    owner: &mut HashMap<String, usize>,
    entries: &[DictionaryEntry],
    domain: DictionaryDomain,
    key: &str,
    idx: usize,
) -> Result<()> {
    match owner.get(key) {
        Some(&existing) if existing != idx => Err(CatalogError::validation(format!(
            "{domain} dictionary key '{key}' is claimed by both '{}' and '{}'",
            entries[existing].canonical_name, entries[idx].canonical_name
        ))),
        _ => {
            owner.insert(key.to_string(), idx);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn normalize_ignores_case_periods_and_spacing() {
        assert_eq!(normalize_key("A.B.C.  Studios"), "abc studios");
        assert_eq!(normalize_key("   "), "");
    }

    #[test]
    fn overlapping_aliases_are_rejected() {
        let err = CanonicalDictionary::new(
            DictionaryDomain::Studios,
            vec![
                DictionaryEntry::new("Alpha", &["Shared"]),
                DictionaryEntry::new("Beta", &["shared."]),
            ],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("'shared'"));
    }

    #[test]
    fn alias_equal_to_another_canonical_is_rejected() {
        let result = CanonicalDictionary::new(
            DictionaryDomain::Roles,
            vec![
                DictionaryEntry::new("Writer", &[]),
                DictionaryEntry::new("Screenwriter", &["writer"]),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn alias_repeating_own_canonical_is_tolerated() {
        let dict = CanonicalDictionary::new(
            DictionaryDomain::Roles,
            vec![DictionaryEntry::new("Writer", &["WRITER", "Scribe"])],
        )
        .unwrap();
        assert_eq!(
            dict.find_alias("scribe").map(|e| e.canonical_name.as_str()),
            Some("Writer")
        );
    }

    #[test]
    fn category_passes_through() {
        let dict = CanonicalDictionary::new(
            DictionaryDomain::Roles,
            vec![DictionaryEntry::new("Director", &["Dir"]).with_category("Creative")],
        )
        .unwrap();
        assert_eq!(dict.category_of("director"), Some("Creative"));
        assert_eq!(dict.category_of("Dir"), None);
    }

    #[test]
    fn builtin_dictionaries_are_consistent() {
        assert!(!builtin::studios().is_empty());
        assert!(!builtin::roles().is_empty());
    }
}
