// crates/watchgate-core/src/suite.rs
// ============================================================================
// Module: Conformance Suite Interface
// Description: Capability trait for conformance suites and their tests.
// Purpose: Define the setup/cleanup/tests contract consumed by the runner.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A suite bundles an ordered list of named tests with setup and cleanup
//! lifecycle hooks. Suites are registered as boxed trait objects and borrowed
//! by the orchestrator for the duration of one run. Tests receive an explicit
//! per-test context instead of relying on a process-global working directory,
//! so no test can observe another test's scratch state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Suite lifecycle errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Suite setup failed.
    #[error("suite setup error: {0}")]
    Setup(String),
    /// Suite cleanup failed.
    #[error("suite cleanup error: {0}")]
    Cleanup(String),
}

/// Test invocation errors.
///
/// # Invariants
/// - A test error is never converted into a recorded outcome.
#[derive(Debug, Error)]
pub enum TestError {
    /// I/O failure during the invocation.
    #[error("test io error: {0}")]
    Io(String),
    /// The invocation itself failed to complete.
    #[error("test invocation error: {0}")]
    Invocation(String),
}

// ============================================================================
// SECTION: Contexts
// ============================================================================

/// Paths handed to a suite's setup and cleanup hooks.
///
/// # Invariants
/// - Both directories exist before `setup` is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteContext {
    /// Category environment directory shared by the category's suites.
    pub category_env: PathBuf,
    /// Directory reserved for this suite's fixtures.
    pub suite_dir: PathBuf,
}

/// Paths handed to a single test invocation.
///
/// # Invariants
/// - `scratch_dir` is private to the invocation and exists beforehand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    /// Category environment directory shared by the category's suites.
    pub category_env: PathBuf,
    /// Scratch directory reserved for this test.
    pub scratch_dir: PathBuf,
}

// ============================================================================
// SECTION: Test Cases
// ============================================================================

/// A test invocation returning a free-form outcome string.
pub type TestFn = fn(&TestContext) -> Result<String, TestError>;

/// A named test belonging to a suite.
///
/// # Invariants
/// - Names are unique within a suite; collisions across suites share one
///   result slot (see [`crate::results::ResultSet`]).
#[derive(Debug, Clone, Copy)]
pub struct TestCase {
    /// Test name as reported in the result table.
    pub name: &'static str,
    /// Invocation executed against the running monitor.
    pub run: TestFn,
}

// ============================================================================
// SECTION: Suite Trait
// ============================================================================

/// Capability set of a conformance suite: setup, cleanup, and ordered tests.
pub trait TestSuite {
    /// Suite name as registered and reported.
    fn name(&self) -> &'static str;

    /// Category this suite belongs to.
    fn category(&self) -> &'static str;

    /// Stem of the suite's configuration fragment file.
    fn fragment_stem(&self) -> String {
        self.name().to_ascii_lowercase()
    }

    /// Prepares suite fixtures before the monitor starts.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Setup`] when fixtures cannot be prepared.
    fn setup(&self, ctx: &SuiteContext) -> Result<(), SuiteError>;

    /// Removes suite fixtures after the monitor has been asked to terminate.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Cleanup`] when fixtures cannot be removed.
    fn cleanup(&self, ctx: &SuiteContext) -> Result<(), SuiteError>;

    /// Ordered tests declared by this suite.
    fn tests(&self) -> Vec<TestCase>;
}
