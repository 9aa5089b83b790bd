// crates/watchgate-core/src/report.rs
// ============================================================================
// Module: Report Rendering
// Description: Two-column tabular rendering of a result set.
// Purpose: Produce the run's human-readable summary table.
// Dependencies: crate::results
// ============================================================================

//! ## Overview
//! Rendering is pure: a result set maps to a two-column table with widths
//! fitted to content. An empty result set renders the header and underline
//! rows only. The caller decides where the table is written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::results::ResultSet;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Column headers of the report table.
pub const REPORT_HEADERS: [&str; 2] = ["Test name", "Outcome"];
/// Separator between the two columns.
const COLUMN_GAP: &str = "  ";

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a result set as a two-column table, rows in insertion order.
#[must_use]
pub fn render_table(results: &ResultSet) -> String {
    let name_width = results
        .iter()
        .map(|(name, _)| name.len())
        .chain(std::iter::once(REPORT_HEADERS[0].len()))
        .max()
        .unwrap_or_default();
    let outcome_width = results
        .iter()
        .map(|(_, outcome)| outcome.len())
        .chain(std::iter::once(REPORT_HEADERS[1].len()))
        .max()
        .unwrap_or_default();

    let mut table = String::new();
    push_row(&mut table, REPORT_HEADERS[0], REPORT_HEADERS[1], name_width);
    push_row(&mut table, &"-".repeat(name_width), &"-".repeat(outcome_width), name_width);
    for (name, outcome) in results.iter() {
        push_row(&mut table, name, outcome, name_width);
    }
    table
}

/// Appends one padded table row terminated by a newline.
fn push_row(table: &mut String, left: &str, right: &str, name_width: usize) {
    table.push_str(left);
    for _ in left.len()..name_width {
        table.push(' ');
    }
    table.push_str(COLUMN_GAP);
    table.push_str(right);
    table.push('\n');
}
