//! Query ranking over a menu snapshot.
//!
//! Fuzzy-matches the query against each item's display text and its full
//! breadcrumb, keeping the better of the two scores. Items are returned
//! best-first; ties keep traversal order, so an empty query yields the
//! snapshot in on-screen menu order.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::types::MenuItemRecord;
use crate::walker::MenuNode;

/// A snapshot record paired with its relevance score.
#[derive(Debug, Clone)]
pub struct Ranked<N> {
    pub record: MenuItemRecord<N>,
    pub score: i64,
}

/// Rank `items` against `query`, best match first, truncated to `limit`.
///
/// A blank query matches everything with score 0, preserving traversal
/// order. Items that match neither their text nor their breadcrumb are
/// dropped.
pub fn rank<N: MenuNode>(
    items: &[MenuItemRecord<N>],
    query: &str,
    limit: usize,
) -> Vec<Ranked<N>> {
    let query = query.trim();
    if query.is_empty() {
        return items
            .iter()
            .take(limit)
            .map(|record| Ranked {
                record: record.clone(),
                score: 0,
            })
            .collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut ranked: Vec<Ranked<N>> = items
        .iter()
        .filter_map(|record| {
            let text_score = matcher.fuzzy_match(record.text(), query);
            let crumb_score = matcher.fuzzy_match(&record.breadcrumb(), query);
            let score = match (text_score, crumb_score) {
                (Some(a), Some(b)) => a.max(b),
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => return None,
            };
            Some(Ranked {
                record: record.clone(),
                score,
            })
        })
        .collect();

    // Stable sort keeps traversal order for equal scores.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, MenuError};
    use crate::walker::NodeAttributes;

    #[derive(Clone, Debug)]
    struct StubNode;

    impl MenuNode for StubNode {
        fn attributes(&self) -> NodeAttributes<Self> {
            NodeAttributes::missing()
        }
        fn actions(&self) -> Attr<Vec<String>> {
            Attr::Missing
        }
        fn press(&self) -> Result<(), MenuError> {
            Ok(())
        }
    }

    fn item(path: &[&str]) -> MenuItemRecord<StubNode> {
        MenuItemRecord {
            path: path.iter().map(|s| s.to_string()).collect(),
            shortcut: String::new(),
            icon: None,
            node: StubNode,
        }
    }

    fn texts(ranked: &[Ranked<StubNode>]) -> Vec<String> {
        ranked.iter().map(|r| r.record.text().to_string()).collect()
    }

    #[test]
    fn test_blank_query_returns_everything_in_order() {
        let items = vec![
            item(&["File", "New"]),
            item(&["File", "Open"]),
            item(&["Edit", "Undo"]),
        ];
        let ranked = rank(&items, "   ", 100);
        assert_eq!(texts(&ranked), vec!["New", "Open", "Undo"]);
        assert!(ranked.iter().all(|r| r.score == 0));
    }

    #[test]
    fn test_non_matching_items_are_dropped() {
        let items = vec![item(&["File", "New"]), item(&["Edit", "Undo"])];
        let ranked = rank(&items, "undo", 100);
        assert_eq!(texts(&ranked), vec!["Undo"]);
    }

    #[test]
    fn test_breadcrumb_matches_when_text_does_not() {
        let items = vec![item(&["File", "Export", "PDF"])];
        let ranked = rank(&items, "export pdf", 100);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_contiguous_match_outranks_scattered_match() {
        let items = vec![
            item(&["File", "Print Document Footer"]),
            item(&["File", "Export PDF"]),
        ];
        let ranked = rank(&items, "pdf", 100);
        assert_eq!(texts(&ranked)[0], "Export PDF");
    }

    #[test]
    fn test_limit_truncates_after_sorting() {
        let items = vec![
            item(&["File", "New"]),
            item(&["File", "New Window"]),
            item(&["File", "New Tab"]),
        ];
        let ranked = rank(&items, "new", 2);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_ties_keep_traversal_order() {
        let items = vec![item(&["A", "Copy"]), item(&["B", "Copy"])];
        let ranked = rank(&items, "", 100);
        assert_eq!(
            ranked
                .iter()
                .map(|r| r.record.breadcrumb())
                .collect::<Vec<_>>(),
            vec!["A > Copy", "B > Copy"]
        );
    }
}
