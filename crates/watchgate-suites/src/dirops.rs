// crates/watchgate-suites/src/dirops.rs
// ============================================================================
// Module: Directory Operation Suite
// Description: Probes for directory create, remove, and rename behavior.
// Purpose: Exercise the filesystem-object operations the monitor governs.
// Dependencies: watchgate-core
// ============================================================================

//! ## Overview
//! `DirOps` probes directory lifecycle operations inside each test's scratch
//! directory. Setup reserves a nursery directory in the category environment
//! that cleanup removes again.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::ErrorKind;

use watchgate_core::SuiteContext;
use watchgate_core::SuiteError;
use watchgate_core::TestCase;
use watchgate_core::TestContext;
use watchgate_core::TestError;
use watchgate_core::TestSuite;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Directory created by setup inside the category environment.
const NURSERY_NAME: &str = "dirops_nursery";

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Directory-manipulation probe suite.
pub struct DirOps;

impl TestSuite for DirOps {
    fn name(&self) -> &'static str {
        "DirOps"
    }

    fn category(&self) -> &'static str {
        "fsobjects"
    }

    fn setup(&self, ctx: &SuiteContext) -> Result<(), SuiteError> {
        fs::create_dir_all(ctx.category_env.join(NURSERY_NAME))
            .map_err(|err| SuiteError::Setup(err.to_string()))
    }

    fn cleanup(&self, ctx: &SuiteContext) -> Result<(), SuiteError> {
        match fs::remove_dir_all(ctx.category_env.join(NURSERY_NAME)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SuiteError::Cleanup(err.to_string())),
        }
    }

    fn tests(&self) -> Vec<TestCase> {
        vec![
            TestCase {
                name: "mkdir_basic",
                run: mkdir_basic,
            },
            TestCase {
                name: "rmdir_basic",
                run: rmdir_basic,
            },
            TestCase {
                name: "rename_dir",
                run: rename_dir,
            },
        ]
    }
}

// ============================================================================
// SECTION: Probes
// ============================================================================

/// Creates a directory in scratch space.
fn mkdir_basic(ctx: &TestContext) -> Result<String, TestError> {
    match fs::create_dir(ctx.scratch_dir.join("made")) {
        Ok(()) => Ok("true".to_string()),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => Ok("false".to_string()),
        Err(err) => Err(TestError::Io(err.to_string())),
    }
}

/// Creates and removes a directory again.
fn rmdir_basic(ctx: &TestContext) -> Result<String, TestError> {
    let path = ctx.scratch_dir.join("doomed");
    fs::create_dir(&path).map_err(|err| TestError::Io(err.to_string()))?;
    match fs::remove_dir(&path) {
        Ok(()) => Ok("true".to_string()),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => Ok("false".to_string()),
        Err(err) => Err(TestError::Io(err.to_string())),
    }
}

/// Renames a directory and checks the new name exists.
fn rename_dir(ctx: &TestContext) -> Result<String, TestError> {
    let source = ctx.scratch_dir.join("before");
    let target = ctx.scratch_dir.join("after");
    fs::create_dir(&source).map_err(|err| TestError::Io(err.to_string()))?;
    match fs::rename(&source, &target) {
        Ok(()) => Ok(target.is_dir().to_string()),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => Ok("false".to_string()),
        Err(err) => Err(TestError::Io(err.to_string())),
    }
}
