//! Username search over loaded transactions

use timepipe_source::TransactionRecord;

/// A trimmed search term, ready for case-insensitive matching
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm {
    trimmed: String,
    needle: String,
}

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim().to_string();
        let needle = trimmed.to_lowercase();
        Self { trimmed, needle }
    }

    /// The term with surrounding whitespace removed
    pub fn as_str(&self) -> &str {
        &self.trimmed
    }

    /// True when there is nothing to filter by
    pub fn is_empty(&self) -> bool {
        self.trimmed.is_empty()
    }

    /// Whether `record` passes this term. An empty term matches everything.
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.is_empty() || record.username.to_lowercase().contains(&self.needle)
    }
}

/// Records whose username contains `term`, in their original order
pub fn filter<'a>(records: &'a [TransactionRecord], term: &SearchTerm) -> Vec<&'a TransactionRecord> {
    records.iter().filter(|r| term.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(name: &str) -> TransactionRecord {
        TransactionRecord::new(name, "2024-01-01T00:00:00Z")
    }

    fn names<'a>(records: &[&'a TransactionRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.username.as_str()).collect()
    }

    #[test]
    fn test_search_term_trims() {
        let term = SearchTerm::new("  Ali \t");
        assert_eq!(term.as_str(), "Ali");
        assert!(!term.is_empty());
        assert!(SearchTerm::new(" \n ").is_empty());
    }

    #[test]
    fn test_blank_term_returns_everything() {
        let records = vec![record("alice"), record("bob")];
        assert_eq!(names(&filter(&records, &SearchTerm::new(""))), vec!["alice", "bob"]);
        assert_eq!(names(&filter(&records, &SearchTerm::new("   "))), vec!["alice", "bob"]);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let records = vec![record("Alice"), record("bob"), record("MALIK"), record("carol")];
        let visible = filter(&records, &SearchTerm::new(" ALI "));
        assert_eq!(names(&visible), vec!["Alice", "MALIK"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let records = vec![record("alice"), record("bob")];
        assert!(filter(&records, &SearchTerm::new("ZZZ")).is_empty());
    }

    #[test]
    fn test_empty_records() {
        assert!(filter(&[], &SearchTerm::new("anything")).is_empty());
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        let records = vec![record("mary ann"), record("maryann")];
        let visible = filter(&records, &SearchTerm::new("y a"));
        assert_eq!(names(&visible), vec!["mary ann"]);
    }

    proptest! {
        #[test]
        fn prop_blank_term_is_identity(
            users in prop::collection::vec("[a-zA-Z]{0,8}", 0..20),
            blank in "[ \t\n]{0,4}",
        ) {
            let records: Vec<_> = users.iter().map(|u| record(u)).collect();
            let visible = filter(&records, &SearchTerm::new(&blank));
            prop_assert_eq!(visible.len(), records.len());
            for (v, r) in visible.iter().zip(records.iter()) {
                prop_assert!(std::ptr::eq(*v, r));
            }
        }

        #[test]
        fn prop_result_is_ordered_subset(
            users in prop::collection::vec("[a-cA-C]{0,6}", 0..30),
            term in "[ a-cA-C]{0,3}",
        ) {
            let records: Vec<_> = users.iter().map(|u| record(u)).collect();
            let search = SearchTerm::new(&term);
            let visible = filter(&records, &search);

            // every visible record sits later in the source than the previous one
            let mut cursor = 0;
            for v in &visible {
                let pos = records[cursor..]
                    .iter()
                    .position(|r| std::ptr::eq(r, *v))
                    .map(|p| p + cursor);
                prop_assert!(pos.is_some());
                cursor = pos.unwrap() + 1;
            }

            let expected = records.iter().filter(|r| search.matches(r)).count();
            prop_assert_eq!(visible.len(), expected);
        }
    }
}
