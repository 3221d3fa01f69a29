//! Fuzzy filtering over ranked lists.
//!
//! Scoring is delegated to the skim matcher. Filtering never reorders
//! entries with equal scores, so a recency-ranked base list keeps its order
//! among equally good matches.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Query-driven filter built on the skim fuzzy matcher
pub struct FuzzyFilter {
    matcher: SkimMatcherV2,
}

impl Default for FuzzyFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FuzzyFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyFilter").finish_non_exhaustive()
    }
}

impl FuzzyFilter {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Score `text` against `query`, `None` when it does not match.
    pub fn score(&self, query: &str, text: &str) -> Option<i64> {
        self.matcher.fuzzy_match(text, query)
    }

    /// Indices of matching items, best score first.
    ///
    /// A blank query matches everything in the original order.
    pub fn filter_indices<T, F>(&self, query: &str, items: &[T], title_of: F) -> Vec<usize>
    where
        F: Fn(&T) -> &str,
    {
        let query = query.trim();
        if query.is_empty() {
            return (0..items.len()).collect();
        }

        let mut scored: Vec<(i64, usize)> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.score(query, title_of(item)).map(|s| (s, i)))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, i)| i).collect()
    }

    /// Matching items, best score first. See [`filter_indices`](Self::filter_indices).
    pub fn filter<T, F>(&self, query: &str, items: &[T], title_of: F) -> Vec<T>
    where
        T: Clone,
        F: Fn(&T) -> &str,
    {
        self.filter_indices(query, items, title_of)
            .into_iter()
            .map(|i| items[i].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles() -> Vec<String> {
        [
            "Switch Session",
            "Kill Session",
            "Kill Current Session",
            "Rename Session",
            "Launch Claude",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    #[test]
    fn blank_query_keeps_everything_in_order() {
        let filter = FuzzyFilter::new();
        assert_eq!(filter.filter("", &titles(), String::as_str), titles());
        assert_eq!(filter.filter("   ", &titles(), String::as_str), titles());
    }

    #[test]
    fn query_keeps_only_matches() {
        let filter = FuzzyFilter::new();
        let found = filter.filter("kill", &titles(), String::as_str);

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|t| t.starts_with("Kill")));
    }

    #[test]
    fn no_match_is_empty() {
        let filter = FuzzyFilter::new();
        assert!(filter.filter("zzzq", &titles(), String::as_str).is_empty());
    }

    #[test]
    fn equal_scores_keep_base_order() {
        let filter = FuzzyFilter::new();
        let items = vec![
            ("b", "Open Project".to_string()),
            ("a", "Open Project".to_string()),
            ("c", "Open Project".to_string()),
        ];

        let found = filter.filter("proj", &items, |(_, title)| title.as_str());
        let ids: Vec<&str> = found.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn score_is_case_insensitive_for_lowercase_queries() {
        let filter = FuzzyFilter::new();
        assert!(filter.score("codex", "Launch Codex").is_some());
        assert!(filter.score("lc", "Launch Codex").is_some());
        assert!(filter.score("xl", "Launch Codex").is_none());
    }
}
