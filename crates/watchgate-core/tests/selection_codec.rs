// crates/watchgate-core/tests/selection_codec.rs
// ============================================================================
// Module: Selection Codec Tests
// Description: Validate selection payload decoding guards and round-trips.
// Purpose: Ensure the host/guest selection channel is strict and lossless.
// ============================================================================

//! ## Overview
//! Covers version pinning, size and name limits, strict field handling, and
//! lossless encode/decode round-trips of the selection payload.

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

use std::io::Write;

use tempfile::NamedTempFile;
use watchgate_core::Selection;
use watchgate_core::SelectionError;

/// Asserts a decode failure whose message contains the needle.
fn assert_invalid(result: Result<Selection, SelectionError>, needle: &str) {
    match result {
        Err(error) => {
            let message = error.to_string();
            assert!(message.contains(needle), "error {message} did not contain {needle}");
        }
        Ok(_) => panic!("expected selection decode to fail"),
    }
}

// ============================================================================
// SECTION: Round Trips
// ============================================================================

/// Tests encode/decode round-trip preserves both ordered lists.
#[test]
fn round_trip_preserves_order() {
    let selection = Selection::new(
        vec!["open_missing".to_string(), "open_valid".to_string()],
        vec!["syscalls".to_string(), "DirOps".to_string()],
    )
    .unwrap();
    let encoded = selection.encode().unwrap();
    let decoded = Selection::decode_str(&encoded).unwrap();
    assert_eq!(decoded, selection);
}

/// Tests file round-trip through a real payload file.
#[test]
fn round_trip_through_file() {
    let selection =
        Selection::new(Vec::new(), vec!["syscalls".to_string()]).unwrap();
    let file = NamedTempFile::new().unwrap();
    selection.encode_file(file.path()).unwrap();
    let decoded = Selection::decode_file(file.path()).unwrap();
    assert_eq!(decoded, selection);
}

// ============================================================================
// SECTION: Decode Guards
// ============================================================================

/// Tests that an unsupported schema version is rejected.
#[test]
fn decode_rejects_unsupported_version() {
    let payload = r#"{"version": 99, "tests": [], "groups": []}"#;
    assert_invalid(Selection::decode_str(payload), "unsupported selection version");
}

/// Tests that unknown payload fields are rejected.
#[test]
fn decode_rejects_unknown_fields() {
    let payload = r#"{"version": 1, "tests": [], "groups": [], "extra": true}"#;
    assert_invalid(Selection::decode_str(payload), "selection parse error");
}

/// Tests that an empty selected name is rejected.
#[test]
fn decode_rejects_empty_name() {
    let payload = r#"{"version": 1, "tests": [""], "groups": []}"#;
    assert_invalid(Selection::decode_str(payload), "must not be empty");
}

/// Tests that an overlong selected name is rejected.
#[test]
fn decode_rejects_overlong_name() {
    let name = "a".repeat(200);
    let payload = format!(r#"{{"version": 1, "tests": [], "groups": ["{name}"]}}"#);
    assert_invalid(Selection::decode_str(&payload), "exceeds max length");
}

/// Tests that an oversized payload file is rejected.
#[test]
fn decode_rejects_oversized_file() {
    let mut file = NamedTempFile::new().unwrap();
    let padding = vec![b' '; 64 * 1024 + 1];
    file.write_all(&padding).unwrap();
    assert_invalid(Selection::decode_file(file.path()), "exceeds size limit");
}

/// Tests that a non-UTF-8 payload file is rejected.
#[test]
fn decode_rejects_non_utf8_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0xFF, 0xFE, 0xFF]).unwrap();
    assert_invalid(Selection::decode_file(file.path()), "must be utf-8");
}

/// Tests that a missing payload file surfaces an I/O error.
#[test]
fn decode_reports_missing_file() {
    let result = Selection::decode_file(std::path::Path::new("/nonexistent/selection.json"));
    assert_invalid(result, "selection io error");
}
