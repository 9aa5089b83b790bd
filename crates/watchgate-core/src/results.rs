// crates/watchgate-core/src/results.rs
// ============================================================================
// Module: Result Set
// Description: Insertion-ordered mapping from test name to outcome string.
// Purpose: Aggregate per-test outcomes for one category batch.
// Dependencies: none
// ============================================================================

//! ## Overview
//! A result set records one outcome string per test name in invocation order.
//! Test names are not namespaced per suite: when two suites declare the same
//! test name, they share one slot — the later outcome wins while the row keeps
//! its first-insertion position. Callers that need distinct rows must ensure
//! unique test names across the suites of a category.

// ============================================================================
// SECTION: Result Set
// ============================================================================

/// Insertion-ordered test-name-to-outcome mapping for one category batch.
///
/// # Invariants
/// - Every entry corresponds to a (suite, test) pair visited during the run.
/// - A name collision overwrites the value in place; position is retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// Ordered (test name, outcome) entries.
    entries: Vec<(String, String)>,
}

impl ResultSet {
    /// Creates an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome, overwriting any prior outcome for the same name.
    pub fn insert(&mut self, name: &str, outcome: String) {
        match self.entries.iter_mut().find(|(known, _)| known == name) {
            Some((_, slot)) => *slot = outcome,
            None => self.entries.push((name.to_string(), outcome)),
        }
    }

    /// Returns the outcome recorded for a test name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(known, _)| known == name)
            .map(|(_, outcome)| outcome.as_str())
    }

    /// Returns the number of recorded outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no outcome has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, outcome)| (name.as_str(), outcome.as_str()))
    }

    /// Returns the recorded test names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }
}
