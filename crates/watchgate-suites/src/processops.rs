// crates/watchgate-suites/src/processops.rs
// ============================================================================
// Module: Process Operation Suite
// Description: Probes for process spawn and exit-status behavior.
// Purpose: Exercise the process-creation operations the monitor governs.
// Dependencies: watchgate-core
// ============================================================================

//! ## Overview
//! `ProcessOps` spawns short-lived shell children and reports the observed
//! exit statuses and output. The suite needs no fixtures; setup and cleanup
//! are no-ops.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::Command;
use std::process::Output;

use watchgate_core::SuiteContext;
use watchgate_core::SuiteError;
use watchgate_core::TestCase;
use watchgate_core::TestContext;
use watchgate_core::TestError;
use watchgate_core::TestSuite;

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Process-creation probe suite.
pub struct ProcessOps;

impl TestSuite for ProcessOps {
    fn name(&self) -> &'static str {
        "ProcessOps"
    }

    fn category(&self) -> &'static str {
        "syscalls"
    }

    fn setup(&self, _ctx: &SuiteContext) -> Result<(), SuiteError> {
        Ok(())
    }

    fn cleanup(&self, _ctx: &SuiteContext) -> Result<(), SuiteError> {
        Ok(())
    }

    fn tests(&self) -> Vec<TestCase> {
        vec![
            TestCase {
                name: "spawn_exit_zero",
                run: spawn_exit_zero,
            },
            TestCase {
                name: "spawn_exit_code",
                run: spawn_exit_code,
            },
            TestCase {
                name: "spawn_stdout",
                run: spawn_stdout,
            },
        ]
    }
}

// ============================================================================
// SECTION: Probes
// ============================================================================

/// Spawns a child that exits zero and checks success.
fn spawn_exit_zero(ctx: &TestContext) -> Result<String, TestError> {
    let output = shell(ctx, "exit 0")?;
    Ok(output.status.success().to_string())
}

/// Spawns a child with a fixed non-zero exit code and checks it.
fn spawn_exit_code(ctx: &TestContext) -> Result<String, TestError> {
    let output = shell(ctx, "exit 3")?;
    Ok((output.status.code() == Some(3)).to_string())
}

/// Spawns a child producing known stdout and compares it.
fn spawn_stdout(ctx: &TestContext) -> Result<String, TestError> {
    let output = shell(ctx, "echo watchgate")?;
    Ok((output.stdout == b"watchgate\n").to_string())
}

/// Runs a shell script inside the test's scratch directory.
///
/// # Errors
///
/// Returns [`TestError::Io`] when the child cannot be spawned or collected.
fn shell(ctx: &TestContext, script: &str) -> Result<Output, TestError> {
    Command::new("sh")
        .args(["-c", script])
        .current_dir(&ctx.scratch_dir)
        .output()
        .map_err(|err| TestError::Io(err.to_string()))
}
