// crates/watchgate-core/tests/report_rendering.rs
// ============================================================================
// Module: Report Rendering Tests
// Description: Validate result aggregation and table rendering.
// Purpose: Ensure outcomes keep insertion order and collisions stay explicit.
// ============================================================================

//! ## Overview
//! Covers the result set's insertion-order and collision semantics and the
//! pure two-column table rendering built on top of it.

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

use watchgate_core::ResultSet;
use watchgate_core::render_table;

// ============================================================================
// SECTION: Result Set Semantics
// ============================================================================

/// Tests that entries keep insertion order.
#[test]
fn result_set_keeps_insertion_order() {
    let mut results = ResultSet::new();
    results.insert("open_valid", "true".to_string());
    results.insert("open_missing", "true".to_string());
    results.insert("fork_basic", "false".to_string());
    assert_eq!(results.names(), vec!["open_valid", "open_missing", "fork_basic"]);
}

/// Tests that a name collision overwrites in place and keeps the first position.
#[test]
fn result_set_collision_overwrites_in_place() {
    let mut results = ResultSet::new();
    results.insert("shared", "first".to_string());
    results.insert("other", "true".to_string());
    results.insert("shared", "second".to_string());
    assert_eq!(results.len(), 2);
    assert_eq!(results.get("shared"), Some("second"));
    assert_eq!(results.names(), vec!["shared", "other"]);
}

// ============================================================================
// SECTION: Table Rendering
// ============================================================================

/// Tests that an empty result set renders headers and underline only.
#[test]
fn empty_results_render_header_only() {
    let table = render_table(&ResultSet::new());
    let expected = "Test name  Outcome\n---------  -------\n";
    assert_eq!(table, expected);
}

/// Tests that the name column width fits the longest name.
#[test]
fn table_width_fits_longest_name() {
    let mut results = ResultSet::new();
    results.insert("open_valid_long_name", "true".to_string());
    results.insert("short", "false".to_string());
    let table = render_table(&results);
    let expected = "Test name             Outcome\n\
                    --------------------  -------\n\
                    open_valid_long_name  true\n\
                    short                 false\n";
    assert_eq!(table, expected);
}

/// Tests the end-to-end three-row report shape of a syscalls batch.
#[test]
fn table_renders_three_rows_in_invocation_order() {
    let mut results = ResultSet::new();
    results.insert("open_valid", "true".to_string());
    results.insert("open_missing", "true".to_string());
    results.insert("fork_basic", "true".to_string());
    let table = render_table(&results);
    let rows: Vec<&str> = table.lines().collect();
    assert_eq!(rows.len(), 5);
    assert!(rows[0].starts_with("Test name"));
    assert!(rows[1].starts_with("---"));
    assert!(rows[2].starts_with("open_valid "));
    assert!(rows[3].starts_with("open_missing"));
    assert!(rows[4].starts_with("fork_basic "));
}
