// crates/watchgate-config/tests/proptest_assembly.rs
// ============================================================================
// Module: Assembly Property-Based Tests
// Description: Property checks for fragment order preservation.
// Purpose: Ensure assembled output equals injected fragments in exact order.
// ============================================================================

//! ## Overview
//! For arbitrary placeholder-free fragment bodies, the assembled file must
//! equal the concatenation of the injected fragments in category-then-suite
//! order. Injection of placeholder-free text is the identity, so the property
//! reduces to exact ordered concatenation.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;
use tempfile::tempdir;
use watchgate_config::ConfigAssembler;
use watchgate_config::PathInjector;
use watchgate_config::ResolvedPaths;

/// Strategy for fragment bodies without placeholder markers.
fn fragment_body() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _./\n-]{0,200}"
}

proptest! {
    /// Assembled output equals category body followed by suite bodies in order.
    #[test]
    fn assembly_equals_ordered_concatenation(
        category_body in fragment_body(),
        suite_bodies in prop::collection::vec(fragment_body(), 0..4),
    ) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("category.conf"), &category_body).unwrap();
        let mut stems = Vec::new();
        for (index, body) in suite_bodies.iter().enumerate() {
            let stem = format!("suite{index}");
            fs::write(dir.path().join(format!("{stem}.conf")), body).unwrap();
            stems.push(stem);
        }

        let injector = PathInjector::from_paths(&ResolvedPaths {
            testing_root: PathBuf::from("/tmp/wg"),
            fragments_dir: dir.path().to_path_buf(),
            test_env: PathBuf::from("/tmp/wg/test_env"),
            tests_dir: PathBuf::from("/tmp/wg/tests"),
        });
        let assembler = ConfigAssembler::new(dir.path(), &injector);
        let output = dir.path().join("merged.conf");
        assembler.assemble_category("category", &stems, &output).unwrap();

        let mut expected = category_body.clone();
        for body in &suite_bodies {
            expected.push_str(body);
        }
        prop_assert_eq!(fs::read_to_string(&output).unwrap(), expected);
    }
}
