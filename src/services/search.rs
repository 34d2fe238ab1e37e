//! Substring search over show records.
//!
//! A linear scan is enough here: catalogs run to hundreds or low thousands
//! of shows. Results come back in storage order, not ranked.

use crate::config::SearchConfig;
use crate::constants::limits;
use crate::models::Show;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchIndex {
    config: SearchConfig,
}

impl SearchIndex {
    /// Limits looser than the catalog-wide bounds are tightened to them.
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config: SearchConfig {
                min_query_length: config.min_query_length.max(limits::MIN_SEARCH_QUERY_LEN),
                max_results: config.max_results.min(limits::MAX_SEARCH_RESULTS),
            },
        }
    }

    /// Returns the shows whose title, network, studios, genre, or status
    /// contain `query` case-insensitively, capped at `max_results`.
    ///
    /// Queries shorter than `min_query_length` return nothing so that
    /// keystroke-driven callers never dump the whole table.
    #[must_use]
    pub fn search(&self, shows: Vec<Show>, query: &str) -> Vec<Show> {
        let needle = query.trim().to_lowercase();
        if needle.chars().count() < self.config.min_query_length {
            return Vec::new();
        }

        shows
            .into_iter()
            .filter(|show| {
                show.searchable_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .take(self.config.max_results)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShowId;

    fn show(title: &str, network: &str, studios: &[&str], genre: Option<&str>) -> Show {
        Show {
            id: ShowId::new(),
            title: title.to_string(),
            network: network.to_string(),
            studios: studios.iter().map(ToString::to_string).collect(),
            genre: genre.map(ToString::to_string),
            subgenre: None,
            episode_count: None,
            source_type: None,
            status: Some("In Development".to_string()),
            order_type: None,
            announcement_date: None,
            notes: Some("unique-notes-marker".to_string()),
            key_creatives: String::new(),
        }
    }

    fn catalog() -> Vec<Show> {
        vec![
            show("The Bear", "FX", &["20th Television"], Some("Comedy")),
            show("Severance", "Apple TV+", &["Apple Studios"], Some("Thriller")),
            show("Bearded Men", "HBO", &["Other: Acme"], None),
        ]
    }

    #[test]
    fn matches_title_case_insensitively_in_storage_order() {
        let results = SearchIndex::default().search(catalog(), "BEAR");
        let titles: Vec<_> = results.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["The Bear", "Bearded Men"]);
    }

    #[test]
    fn matches_studios_genre_and_status() {
        let index = SearchIndex::default();
        assert_eq!(index.search(catalog(), "acme").len(), 1);
        assert_eq!(index.search(catalog(), "thrill").len(), 1);
        assert_eq!(index.search(catalog(), "development").len(), 3);
    }

    #[test]
    fn does_not_search_notes() {
        assert!(
            SearchIndex::default()
                .search(catalog(), "unique-notes-marker")
                .is_empty()
        );
    }

    #[test]
    fn short_queries_return_nothing() {
        let index = SearchIndex::default();
        assert!(index.search(catalog(), "").is_empty());
        assert!(index.search(catalog(), " b ").is_empty());
        assert!(!index.search(catalog(), "fx").is_empty());
    }

    #[test]
    fn results_are_capped() {
        let shows: Vec<Show> = (0..120)
            .map(|i| show(&format!("Pilot {i}"), "NBC", &["Universal Television"], None))
            .collect();
        assert_eq!(SearchIndex::default().search(shows, "pilot").len(), 50);
    }

    #[test]
    fn custom_limits_apply() {
        let index = SearchIndex::new(SearchConfig {
            min_query_length: 4,
            max_results: 1,
        });
        assert!(index.search(catalog(), "bea").is_empty());
        assert_eq!(index.search(catalog(), "bear").len(), 1);
    }

    #[test]
    fn loose_limits_are_tightened() {
        let index = SearchIndex::new(SearchConfig {
            min_query_length: 1,
            max_results: 100,
        });
        let shows: Vec<Show> = (0..60)
            .map(|i| show(&format!("Pilot {i}"), "NBC", &["Universal Television"], None))
            .collect();
        assert_eq!(index.search(shows.clone(), "pilot").len(), 50);
        assert!(index.search(shows, "p").is_empty());
    }
}
