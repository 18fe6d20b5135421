use std::sync::Arc;

use crate::catalog::{Catalog, GameDescriptor};

/// Shown in place of the card grid when a query matches nothing.
pub const EMPTY_RESULTS_MESSAGE: &str = "No games found matching your search.";

/// Every game whose title or description contains `query`, ignoring case, in
/// catalog order. An empty query returns the whole catalog.
pub fn filter<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a Arc<GameDescriptor>> {
    if query.is_empty() {
        return catalog.iter().collect();
    }
    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|game| game.matches_lowercase(&needle))
        .collect()
}

/// Live text of the library search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    /// Replace the query. Returns false when nothing changed.
    pub fn set(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text.clear();
        self.text.push_str(text);
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{chess_catalog, make_catalog};

    fn ids(games: &[&Arc<GameDescriptor>]) -> Vec<String> {
        games.iter().map(|g| g.id.to_string()).collect()
    }

    #[test]
    fn matches_title_case_insensitively() {
        let catalog = chess_catalog();
        assert_eq!(ids(&filter(&catalog, "chess")), ["1"]);
    }

    #[test]
    fn matches_description() {
        let catalog = chess_catalog();
        assert_eq!(ids(&filter(&catalog, "Strategy")), ["1"]);
    }

    #[test]
    fn no_match_is_empty() {
        let catalog = chess_catalog();
        assert!(filter(&catalog, "golf").is_empty());
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let catalog = make_catalog(&["Zeta", "Alpha", "Mid"]);
        assert_eq!(ids(&filter(&catalog, "")), ["0", "1", "2"]);
    }

    #[test]
    fn keeps_catalog_order() {
        let catalog = make_catalog(&["Run 3", "Slope", "Run 2", "Runner"]);
        assert_eq!(ids(&filter(&catalog, "run")), ["0", "2", "3"]);
    }

    #[test]
    fn query_set_reports_change() {
        let mut query = SearchQuery::default();
        assert!(query.set("sl"));
        assert!(!query.set("sl"));
        assert_eq!(query.as_str(), "sl");
        query.clear();
        assert!(query.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn result_is_ordered_matching_subset(
                titles in proptest::collection::vec("[a-zA-Z][a-zA-Z ]{0,11}", 0..12),
                query in "[a-zA-Z]{0,3}"
            ) {
                let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
                let catalog = make_catalog(&refs);
                let result = filter(&catalog, &query);

                // Subset in catalog order: positions strictly increase.
                let mut last = None;
                for game in &result {
                    let pos = catalog.iter().position(|g| g.id == game.id);
                    prop_assert!(pos.is_some());
                    prop_assert!(last < pos);
                    last = pos;

                    let needle = query.to_lowercase();
                    prop_assert!(
                        game.title.to_lowercase().contains(&needle)
                            || game.description.to_lowercase().contains(&needle)
                    );
                }

                // Nothing that matches was dropped.
                let expected = catalog
                    .iter()
                    .filter(|g| g.matches_lowercase(&query.to_lowercase()))
                    .count();
                prop_assert_eq!(result.len(), expected);
            }

            #[test]
            fn empty_query_is_identity(
                titles in proptest::collection::vec("[a-z]{1,8}", 0..10)
            ) {
                let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
                let catalog = make_catalog(&refs);
                let all: Vec<_> = catalog.iter().collect();
                prop_assert_eq!(filter(&catalog, ""), all);
            }
        }
    }
}
