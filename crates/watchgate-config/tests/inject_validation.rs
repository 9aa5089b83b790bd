// crates/watchgate-config/tests/inject_validation.rs
// ============================================================================
// Module: Path Injection Tests
// Description: Validate placeholder substitution semantics.
// Purpose: Ensure injection is pure, exact, and fail-closed.
// ============================================================================

//! ## Overview
//! Covers standard layout placeholders, custom mappings, pass-through of
//! placeholder-free text, and the fail-closed handling of unknown or
//! unterminated placeholders.

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

use std::path::PathBuf;

use watchgate_config::PathInjector;
use watchgate_config::ResolvedPaths;

/// Builds a resolved layout rooted at a fixed path.
fn layout() -> ResolvedPaths {
    ResolvedPaths {
        testing_root: PathBuf::from("/tmp/wg"),
        fragments_dir: PathBuf::from("/tmp/wg/fragments"),
        test_env: PathBuf::from("/tmp/wg/test_env"),
        tests_dir: PathBuf::from("/tmp/wg/tests"),
    }
}

// ============================================================================
// SECTION: Substitution
// ============================================================================

/// Tests that layout placeholders substitute to resolved directories.
#[test]
fn layout_placeholders_substitute() {
    let injector = PathInjector::from_paths(&layout());
    let raw = "tree \"@{test_env}\" {\n  include @{fragments}/base;\n}\n";
    let injected = injector.inject(raw).unwrap();
    assert_eq!(injected, "tree \"/tmp/wg/test_env\" {\n  include /tmp/wg/fragments/base;\n}\n");
}

/// Tests that a custom mapping participates in substitution.
#[test]
fn custom_mapping_substitutes() {
    let mut injector = PathInjector::from_paths(&layout());
    injector.insert("socket", "/run/monitor.sock");
    let injected = injector.inject("listen @{socket}\n").unwrap();
    assert_eq!(injected, "listen /run/monitor.sock\n");
}

/// Tests that text without placeholders passes through unchanged.
#[test]
fn placeholder_free_text_passes_through() {
    let injector = PathInjector::from_paths(&layout());
    let raw = "limit open 64\nemail admin@example.com\n";
    assert_eq!(injector.inject(raw).unwrap(), raw);
}

/// Tests that repeated placeholders substitute at every occurrence.
#[test]
fn repeated_placeholders_substitute_each_time() {
    let injector = PathInjector::from_paths(&layout());
    let injected = injector.inject("@{tests} @{tests}").unwrap();
    assert_eq!(injected, "/tmp/wg/tests /tmp/wg/tests");
}

// ============================================================================
// SECTION: Fail-Closed Guards
// ============================================================================

/// Tests that an unknown placeholder fails injection.
#[test]
fn unknown_placeholder_fails() {
    let injector = PathInjector::from_paths(&layout());
    let error = injector.inject("path @{mystery}").unwrap_err();
    assert!(error.to_string().contains("unknown path placeholder: mystery"));
}

/// Tests that an unterminated placeholder fails injection.
#[test]
fn unterminated_placeholder_fails() {
    let injector = PathInjector::from_paths(&layout());
    let error = injector.inject("path @{test_env").unwrap_err();
    assert!(error.to_string().contains("unterminated path placeholder"));
}
