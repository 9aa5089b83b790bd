// crates/watchgate-runner/src/workspace.rs
// ============================================================================
// Module: Run Workspace
// Description: Per-run directory scaffolding under the testing root.
// Purpose: Give every category, suite, and test an isolated directory.
// Dependencies: watchgate-config, tracing
// ============================================================================

//! ## Overview
//! Each run wipes and recreates the test environment and tests directories,
//! then creates one directory per category, per suite, and per test. Tests
//! receive their scratch directory through an explicit context instead of a
//! process-global working directory, so a test never observes another test's
//! scratch state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
use watchgate_config::ResolvedPaths;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Run workspace errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// I/O failure while preparing run directories.
    #[error("workspace io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Category Directories
// ============================================================================

/// Per-category directories created for one run.
///
/// # Invariants
/// - Both directories exist once `prepare_category` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDirs {
    /// Category environment directory inside the test environment.
    pub category_env: PathBuf,
    /// Category directory inside the tests scaffolding tree.
    pub category_tests: PathBuf,
}

// ============================================================================
// SECTION: Run Workspace
// ============================================================================

/// Owner of the run's directory scaffolding.
///
/// # Invariants
/// - `prepare` removed any prior run's content before recreating the tree.
pub struct RunWorkspace {
    /// Runtime environment directory read by the monitor.
    test_env: PathBuf,
    /// Per-suite scaffolding directory.
    tests_dir: PathBuf,
}

impl RunWorkspace {
    /// Wipes and recreates the run directories under the testing root.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when a directory cannot be recreated.
    pub fn prepare(paths: &ResolvedPaths) -> Result<Self, WorkspaceError> {
        for dir in [&paths.test_env, &paths.tests_dir] {
            remove_existing(dir)?;
            fs::create_dir_all(dir)
                .map_err(|err| WorkspaceError::Io(format!("create {}: {err}", dir.display())))?;
            tracing::debug!(dir = %dir.display(), "run directory recreated");
        }
        Ok(Self {
            test_env: paths.test_env.clone(),
            tests_dir: paths.tests_dir.clone(),
        })
    }

    /// Returns the test environment directory.
    #[must_use]
    pub fn test_env(&self) -> &Path {
        &self.test_env
    }

    /// Returns the tests scaffolding directory.
    #[must_use]
    pub fn tests_dir(&self) -> &Path {
        &self.tests_dir
    }

    /// Creates the environment and scaffolding directories for a category.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when a directory cannot be created.
    pub fn prepare_category(&self, category: &str) -> Result<CategoryDirs, WorkspaceError> {
        let category_env = self.test_env.join(category);
        let category_tests = self.tests_dir.join(category);
        for dir in [&category_env, &category_tests] {
            fs::create_dir_all(dir)
                .map_err(|err| WorkspaceError::Io(format!("create {}: {err}", dir.display())))?;
        }
        tracing::debug!(category, "category directories created");
        Ok(CategoryDirs {
            category_env,
            category_tests,
        })
    }

    /// Creates a suite's directory and one scratch directory per test.
    ///
    /// Returns the suite directory; each test's scratch directory is the
    /// suite directory joined with the test name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when a directory cannot be created.
    pub fn prepare_suite(
        &self,
        dirs: &CategoryDirs,
        suite_name: &str,
        test_names: &[&str],
    ) -> Result<PathBuf, WorkspaceError> {
        let suite_dir = dirs.category_tests.join(suite_name);
        fs::create_dir_all(&suite_dir)
            .map_err(|err| WorkspaceError::Io(format!("create {}: {err}", suite_dir.display())))?;
        for name in test_names {
            let scratch = suite_dir.join(name);
            fs::create_dir_all(&scratch).map_err(|err| {
                WorkspaceError::Io(format!("create {}: {err}", scratch.display()))
            })?;
        }
        tracing::debug!(suite = suite_name, tests = test_names.len(), "suite directories created");
        Ok(suite_dir)
    }

    /// Installs the merged category config at the live policy path.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] when the copy fails.
    pub fn install_live_policy(&self, merged: &Path, live: &Path) -> Result<(), WorkspaceError> {
        fs::copy(merged, live).map_err(|err| {
            WorkspaceError::Io(format!("install {}: {err}", live.display()))
        })?;
        Ok(())
    }
}

/// Removes a directory tree if it exists.
///
/// # Errors
///
/// Returns [`WorkspaceError`] when removal fails for an existing tree.
fn remove_existing(dir: &Path) -> Result<(), WorkspaceError> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .map_err(|err| WorkspaceError::Io(format!("remove {}: {err}", dir.display())))?;
    }
    Ok(())
}
