// crates/watchgate-core/tests/registry_resolution.rs
// ============================================================================
// Module: Registry Resolution Tests
// Description: Validate selection resolution against a populated registry.
// Purpose: Ensure category batches are deterministic and fail-closed.
// ============================================================================

//! ## Overview
//! Covers group resolution (category and suite names), ordering guarantees,
//! test filtering, and the fail-closed handling of unknown names.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use watchgate_core::Selection;
use watchgate_core::SuiteContext;
use watchgate_core::SuiteError;
use watchgate_core::SuiteRegistry;
use watchgate_core::TestCase;
use watchgate_core::TestContext;
use watchgate_core::TestError;
use watchgate_core::TestSuite;

// ============================================================================
// SECTION: Stub Suites
// ============================================================================

/// Invocation stub returning a fixed outcome.
fn pass(_ctx: &TestContext) -> Result<String, TestError> {
    Ok("true".to_string())
}

/// Stub suite parameterized by name, category, and test names.
struct StubSuite {
    /// Suite name.
    name: &'static str,
    /// Category name.
    category: &'static str,
    /// Declared test names in order.
    tests: Vec<&'static str>,
}

impl TestSuite for StubSuite {
    fn name(&self) -> &'static str {
        self.name
    }

    fn category(&self) -> &'static str {
        self.category
    }

    fn setup(&self, _ctx: &SuiteContext) -> Result<(), SuiteError> {
        Ok(())
    }

    fn cleanup(&self, _ctx: &SuiteContext) -> Result<(), SuiteError> {
        Ok(())
    }

    fn tests(&self) -> Vec<TestCase> {
        self.tests
            .iter()
            .copied()
            .map(|name| TestCase {
                name,
                run: pass,
            })
            .collect()
    }
}

/// Builds a registry with two categories and three suites.
fn populated_registry() -> SuiteRegistry {
    let mut registry = SuiteRegistry::new();
    registry
        .register(Box::new(StubSuite {
            name: "FileOps",
            category: "syscalls",
            tests: vec!["open_valid", "open_missing"],
        }))
        .unwrap();
    registry
        .register(Box::new(StubSuite {
            name: "ProcessOps",
            category: "syscalls",
            tests: vec!["fork_basic"],
        }))
        .unwrap();
    registry
        .register(Box::new(StubSuite {
            name: "DirOps",
            category: "fsobjects",
            tests: vec!["mkdir_basic"],
        }))
        .unwrap();
    registry
}

/// Selection helper over owned strings.
fn selection(tests: &[&str], groups: &[&str]) -> Selection {
    Selection::new(
        tests.iter().map(ToString::to_string).collect(),
        groups.iter().map(ToString::to_string).collect(),
    )
    .unwrap()
}

// ============================================================================
// SECTION: Group Resolution
// ============================================================================

/// Tests that a category name selects all of its suites in registration order.
#[test]
fn category_name_selects_all_suites() {
    let registry = populated_registry();
    let resolved = registry.resolve(&selection(&[], &["syscalls"])).unwrap();
    assert_eq!(resolved.len(), 1);
    let category = &resolved.categories()[0];
    assert_eq!(category.name, "syscalls");
    let names: Vec<&str> = category.suites.iter().map(|entry| entry.suite.name()).collect();
    assert_eq!(names, vec!["FileOps", "ProcessOps"]);
}

/// Tests that a suite name selects only that suite under its category.
#[test]
fn suite_name_selects_single_suite() {
    let registry = populated_registry();
    let resolved = registry.resolve(&selection(&[], &["ProcessOps"])).unwrap();
    assert_eq!(resolved.len(), 1);
    let category = &resolved.categories()[0];
    assert_eq!(category.name, "syscalls");
    assert_eq!(category.suites.len(), 1);
    assert_eq!(category.suites[0].suite.name(), "ProcessOps");
}

/// Tests that categories iterate in lexicographic order.
#[test]
fn categories_iterate_in_sorted_order() {
    let registry = populated_registry();
    let resolved = registry.resolve(&selection(&[], &["syscalls", "fsobjects"])).unwrap();
    let names: Vec<&str> =
        resolved.categories().iter().map(|category| category.name.as_str()).collect();
    assert_eq!(names, vec!["fsobjects", "syscalls"]);
}

/// Tests that duplicate group mentions do not duplicate suites.
#[test]
fn duplicate_groups_resolve_once() {
    let registry = populated_registry();
    let resolved = registry.resolve(&selection(&[], &["syscalls", "FileOps"])).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved.categories()[0].suites.len(), 2);
}

/// Tests that an unknown group name fails resolution.
#[test]
fn unknown_group_fails_resolution() {
    let registry = populated_registry();
    let error = registry.resolve(&selection(&[], &["netops"])).unwrap_err();
    assert!(error.to_string().contains("unknown suite or category name: netops"));
}

// ============================================================================
// SECTION: Test Filtering
// ============================================================================

/// Tests that an empty test list selects every declared test.
#[test]
fn empty_test_list_selects_all_tests() {
    let registry = populated_registry();
    let resolved = registry.resolve(&selection(&[], &["syscalls"])).unwrap();
    let counts: Vec<usize> =
        resolved.categories()[0].suites.iter().map(|entry| entry.tests.len()).collect();
    assert_eq!(counts, vec![2, 1]);
}

/// Tests that a test filter keeps declared order and drops unselected tests.
#[test]
fn test_filter_preserves_declared_order() {
    let registry = populated_registry();
    let resolved =
        registry.resolve(&selection(&["open_missing", "open_valid"], &["syscalls"])).unwrap();
    let file_ops = &resolved.categories()[0].suites[0];
    let names: Vec<&str> = file_ops.tests.iter().map(|case| case.name).collect();
    assert_eq!(names, vec!["open_valid", "open_missing"]);
    let process_ops = &resolved.categories()[0].suites[1];
    assert!(process_ops.tests.is_empty());
}

/// Tests that a test name matching no selected suite fails resolution.
#[test]
fn unknown_test_fails_resolution() {
    let registry = populated_registry();
    let error = registry.resolve(&selection(&["mkdir_basic"], &["syscalls"])).unwrap_err();
    assert!(error.to_string().contains("unknown test name: mkdir_basic"));
}

// ============================================================================
// SECTION: Registration Guards
// ============================================================================

/// Tests that duplicate suite names are rejected at registration.
#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = populated_registry();
    let error = registry
        .register(Box::new(StubSuite {
            name: "FileOps",
            category: "syscalls",
            tests: Vec::new(),
        }))
        .unwrap_err();
    assert!(error.to_string().contains("duplicate suite registration: FileOps"));
}

/// Tests that an empty selection resolves to zero categories.
#[test]
fn empty_selection_resolves_empty() {
    let registry = populated_registry();
    let resolved = registry.resolve(&selection(&[], &[])).unwrap();
    assert!(resolved.is_empty());
}
