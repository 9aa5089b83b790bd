// crates/watchgate-core/src/registry.rs
// ============================================================================
// Module: Suite Registry
// Description: Explicit registry mapping categories to ordered suites.
// Purpose: Resolve a host selection into category batches without global state.
// Dependencies: crate::{selection, suite}
// ============================================================================

//! ## Overview
//! The registry owns every known suite as a boxed trait object and resolves a
//! decoded [`Selection`] into per-category batches. It is an explicit value
//! constructed at orchestrator start and passed by reference, never a
//! process-wide mutable global. Resolution fails closed: any unknown
//! category, suite, or test name aborts before configuration assembly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use thiserror::Error;

use crate::selection::Selection;
use crate::suite::TestCase;
use crate::suite::TestSuite;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Suite registration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A suite with the same name is already registered.
    #[error("duplicate suite registration: {0}")]
    DuplicateSuite(String),
}

/// Selection resolution errors.
///
/// # Invariants
/// - Resolution performs no side effects before failing.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// A selected group matches neither a category nor a suite name.
    #[error("unknown suite or category name: {0}")]
    UnknownGroup(String),
    /// A selected test name exists in none of the selected suites.
    #[error("unknown test name: {0}")]
    UnknownTest(String),
}

// ============================================================================
// SECTION: Resolved Selection
// ============================================================================

/// A selected suite together with the tests chosen from it.
///
/// # Invariants
/// - `tests` preserves the suite's declared order.
pub struct SelectedSuite<'reg> {
    /// Borrowed suite reference, owned by the registry.
    pub suite: &'reg dyn TestSuite,
    /// Tests to execute, filtered by the selection's test list.
    pub tests: Vec<TestCase>,
}

/// One category's ordered suite batch.
///
/// # Invariants
/// - `suites` preserves registration order within the category.
pub struct ResolvedCategory<'reg> {
    /// Category name.
    pub name: String,
    /// Ordered suites selected for this category.
    pub suites: Vec<SelectedSuite<'reg>>,
}

/// The full category-to-suites mapping for one run.
///
/// # Invariants
/// - Categories iterate in lexicographic order for deterministic runs.
pub struct ResolvedSelection<'reg> {
    /// Ordered category batches.
    categories: Vec<ResolvedCategory<'reg>>,
}

impl<'reg> ResolvedSelection<'reg> {
    /// Returns the ordered category batches.
    #[must_use]
    pub fn categories(&self) -> &[ResolvedCategory<'reg>] {
        &self.categories
    }

    /// Returns the number of resolved categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true when the selection resolved to no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl std::fmt::Debug for ResolvedSelection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSelection")
            .field("categories", &self.categories.len())
            .finish()
    }
}

// ============================================================================
// SECTION: Suite Registry
// ============================================================================

/// Registry of all known conformance suites.
///
/// # Invariants
/// - Suite names are unique across the registry.
/// - Registration order is preserved within each category.
#[derive(Default)]
pub struct SuiteRegistry {
    /// Registered suites in registration order.
    suites: Vec<Box<dyn TestSuite>>,
}

impl SuiteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a suite.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateSuite`] when the name is taken.
    pub fn register(&mut self, suite: Box<dyn TestSuite>) -> Result<(), RegistryError> {
        if self.suites.iter().any(|known| known.name() == suite.name()) {
            return Err(RegistryError::DuplicateSuite(suite.name().to_string()));
        }
        self.suites.push(suite);
        Ok(())
    }

    /// Returns the number of registered suites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    /// Returns true when no suite is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Resolves a selection into ordered category batches.
    ///
    /// A group name selects a whole category when it matches one, otherwise a
    /// single suite. A non-empty test list filters each selected suite's tests
    /// and must only name tests that exist in at least one selected suite.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] for unknown group or test names.
    pub fn resolve(&self, selection: &Selection) -> Result<ResolvedSelection<'_>, ResolutionError> {
        let selected = self.select_indices(&selection.groups)?;
        let mut by_category: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for index in &selected {
            let category = self.suites[*index].category();
            by_category.entry(category).or_default().push(*index);
        }

        let requested: Vec<&str> = selection.tests.iter().map(String::as_str).collect();
        let mut matched: BTreeSet<&str> = BTreeSet::new();

        let mut categories = Vec::with_capacity(by_category.len());
        for (category, indices) in by_category {
            let mut suites = Vec::with_capacity(indices.len());
            for index in indices {
                let suite = self.suites[index].as_ref();
                let tests = filter_tests(suite.tests(), &requested, &mut matched);
                suites.push(SelectedSuite {
                    suite,
                    tests,
                });
            }
            categories.push(ResolvedCategory {
                name: category.to_string(),
                suites,
            });
        }

        for name in &requested {
            if !matched.contains(name) {
                return Err(ResolutionError::UnknownTest((*name).to_string()));
            }
        }

        Ok(ResolvedSelection {
            categories,
        })
    }

    /// Maps group names to suite indices, deduplicated in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::UnknownGroup`] for unmatched names.
    fn select_indices(&self, groups: &[String]) -> Result<BTreeSet<usize>, ResolutionError> {
        let mut selected = BTreeSet::new();
        for group in groups {
            let category_indices: Vec<usize> = self
                .suites
                .iter()
                .enumerate()
                .filter(|(_, suite)| suite.category() == group.as_str())
                .map(|(index, _)| index)
                .collect();
            if !category_indices.is_empty() {
                selected.extend(category_indices);
                continue;
            }
            let suite_index =
                self.suites.iter().position(|suite| suite.name() == group.as_str());
            match suite_index {
                Some(index) => {
                    selected.insert(index);
                }
                None => return Err(ResolutionError::UnknownGroup(group.clone())),
            }
        }
        Ok(selected)
    }
}

/// Filters a suite's declared tests by the requested names.
///
/// Preserves declared order and records every requested name that matched.
fn filter_tests<'sel>(
    declared: Vec<TestCase>,
    requested: &[&'sel str],
    matched: &mut BTreeSet<&'sel str>,
) -> Vec<TestCase> {
    if requested.is_empty() {
        return declared;
    }
    let mut kept = Vec::new();
    for case in declared {
        if let Some(name) = requested.iter().find(|name| **name == case.name) {
            matched.insert(*name);
            kept.push(case);
        }
    }
    kept
}
