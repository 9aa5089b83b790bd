// crates/watchgate-suites/src/fileops.rs
// ============================================================================
// Module: File Operation Suite
// Description: Probes for file open, read, and unlink behavior.
// Purpose: Exercise the file-access operations the monitor governs.
// Dependencies: watchgate-core
// ============================================================================

//! ## Overview
//! `FileOps` prepares a fixture file in the category environment and probes
//! open/read/unlink behavior against it. Outcomes report what the process
//! observed; under a denying policy the same probes yield `"false"` outcomes
//! without erroring.

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

/// Fixture filename created by setup inside the category environment.
const FIXTURE_NAME: &str = "fileops_fixture.txt";
/// Fixture content written by setup and expected by the read probe.
const FIXTURE_CONTENT: &str = "watchgate fileops fixture\n";

// ============================================================================
// SECTION: Suite
// ============================================================================

/// File-access probe suite.
pub struct FileOps;

impl TestSuite for FileOps {
    fn name(&self) -> &'static str {
        "FileOps"
    }

    fn category(&self) -> &'static str {
        "syscalls"
    }

    fn setup(&self, ctx: &SuiteContext) -> Result<(), SuiteError> {
        fs::write(ctx.category_env.join(FIXTURE_NAME), FIXTURE_CONTENT)
            .map_err(|err| SuiteError::Setup(err.to_string()))
    }

    fn cleanup(&self, ctx: &SuiteContext) -> Result<(), SuiteError> {
        match fs::remove_file(ctx.category_env.join(FIXTURE_NAME)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SuiteError::Cleanup(err.to_string())),
        }
    }

    fn tests(&self) -> Vec<TestCase> {
        vec![
            TestCase {
                name: "open_existing",
                run: open_existing,
            },
            TestCase {
                name: "open_missing",
                run: open_missing,
            },
            TestCase {
                name: "create_unlink",
                run: create_unlink,
            },
        ]
    }
}

// ============================================================================
// SECTION: Probes
// ============================================================================

/// Reads the fixture file and compares its content.
fn open_existing(ctx: &TestContext) -> Result<String, TestError> {
    match fs::read_to_string(ctx.category_env.join(FIXTURE_NAME)) {
        Ok(content) => Ok((content == FIXTURE_CONTENT).to_string()),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => Ok("false".to_string()),
        Err(err) => Err(TestError::Io(err.to_string())),
    }
}

/// Opens a path that must not exist and expects not-found.
fn open_missing(ctx: &TestContext) -> Result<String, TestError> {
    match fs::File::open(ctx.category_env.join("no_such_file.txt")) {
        Ok(_) => Ok("false".to_string()),
        Err(err) => Ok((err.kind() == ErrorKind::NotFound).to_string()),
    }
}

/// Creates a scratch file and unlinks it again.
fn create_unlink(ctx: &TestContext) -> Result<String, TestError> {
    let path = ctx.scratch_dir.join("transient.txt");
    if let Err(err) = fs::write(&path, b"transient") {
        if err.kind() == ErrorKind::PermissionDenied {
            return Ok("false".to_string());
        }
        return Err(TestError::Io(err.to_string()));
    }
    match fs::remove_file(&path) {
        Ok(()) => Ok("true".to_string()),
        Err(err) if err.kind() == ErrorKind::PermissionDenied => Ok("false".to_string()),
        Err(err) => Err(TestError::Io(err.to_string())),
    }
}
