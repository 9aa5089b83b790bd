// crates/watchgate-runner/src/director.rs
// ============================================================================
// Module: Test Director
// Description: Top-level orchestration of one conformance run.
// Purpose: Drive selection, assembly, supervision, execution, and reporting.
// Dependencies: watchgate-config, watchgate-core, watchgate-monitor
// ============================================================================

//! ## Overview
//! The director turns a selection file into per-category reports: it decodes
//! and resolves the selection, synthesizes the base monitor configuration once
//! per run, and for each category assembles the merged policy config, starts
//! the monitor, executes the suite batch, and renders the result table.
//! Failures propagate and end the run, but monitor termination and the
//! current category's suite cleanups run on every exit path. Cleanups are not
//! re-run for categories that already completed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use watchgate_config::AssemblyError;
use watchgate_config::ConfigAssembler;
use watchgate_config::HarnessConfig;
use watchgate_config::PathInjector;
use watchgate_config::ResolvedPaths;
use watchgate_core::ResolvedCategory;
use watchgate_core::ResolutionError;
use watchgate_core::ResultSet;
use watchgate_core::SelectedSuite;
use watchgate_core::Selection;
use watchgate_core::SelectionError;
use watchgate_core::SuiteContext;
use watchgate_core::SuiteError;
use watchgate_core::SuiteRegistry;
use watchgate_core::TestContext;
use watchgate_core::TestError;
use watchgate_core::render_table;
use watchgate_monitor::MonitorError;
use watchgate_monitor::MonitorHandle;
use watchgate_monitor::MonitorSpec;
use watchgate_monitor::ReadinessPolicy;
use watchgate_monitor::resolve_warmup;

use crate::workspace::CategoryDirs;
use crate::workspace::RunWorkspace;
use crate::workspace::WorkspaceError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Filename capturing the monitor's stdout inside the test environment.
const MONITOR_STDOUT_LOG: &str = "monitor.out.log";
/// Filename capturing the monitor's stderr inside the test environment.
const MONITOR_STDERR_LOG: &str = "monitor.err.log";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal errors ending a conformance run.
///
/// # Invariants
/// - No variant is converted into a per-test outcome.
#[derive(Debug, Error)]
pub enum DirectorError {
    /// Selection payload could not be decoded.
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),
    /// Selection named unknown categories, suites, or tests.
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),
    /// Run directories could not be prepared.
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    /// Config assembly failed.
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),
    /// Monitor supervision failed.
    #[error("monitor error: {0}")]
    Monitor(#[from] MonitorError),
    /// A suite lifecycle hook failed.
    #[error("suite error: {0}")]
    Suite(#[from] SuiteError),
    /// A test invocation failed.
    #[error("test error: {0}")]
    Test(#[from] TestError),
    /// The report could not be written.
    #[error("report output error: {0}")]
    Output(String),
}

// ============================================================================
// SECTION: Test Director
// ============================================================================

/// Top-level driver of one conformance run.
///
/// # Invariants
/// - The registry outlives the director; suites are borrowed per run.
/// - One director drives at most one run at a time against its testing root.
pub struct TestDirector<'reg> {
    /// Validated harness configuration.
    config: HarnessConfig,
    /// Registry holding every known suite.
    registry: &'reg SuiteRegistry,
}

impl<'reg> TestDirector<'reg> {
    /// Creates a director over a validated configuration and registry.
    #[must_use]
    pub fn new(config: HarnessConfig, registry: &'reg SuiteRegistry) -> Self {
        Self {
            config,
            registry,
        }
    }

    /// Runs the batch selected by the payload file, writing reports to `out`.
    ///
    /// One report table is written per resolved category, in category order.
    /// A category whose batch fails produces no report and ends the run.
    ///
    /// # Errors
    ///
    /// Returns [`DirectorError`] on the first fatal stage failure.
    pub fn run(&self, selection_path: &Path, out: &mut dyn Write) -> Result<(), DirectorError> {
        let paths = self.config.paths.resolve();
        let selection = Selection::decode_file(selection_path)?;
        tracing::info!(
            tests = selection.tests.len(),
            groups = selection.groups.len(),
            "selection decoded"
        );
        let resolved = self.registry.resolve(&selection)?;

        let workspace = RunWorkspace::prepare(&paths)?;
        let injector = PathInjector::from_paths(&paths);
        let assembler = ConfigAssembler::new(&paths.fragments_dir, &injector);

        let base_path = paths.base_monitor_config_path(&self.config.monitor.config_name);
        assembler.synthesize_base(&self.config.monitor.config_name, &base_path)?;
        tracing::info!(path = %base_path.display(), "base monitor config synthesized");

        for category in resolved.categories() {
            let results = self.run_category(category, &paths, &workspace, &assembler)?;
            let table = render_table(&results);
            out.write_all(table.as_bytes())
                .map_err(|err| DirectorError::Output(err.to_string()))?;
            out.write_all(b"\n").map_err(|err| DirectorError::Output(err.to_string()))?;
        }
        Ok(())
    }

    /// Runs one category: assembly, supervision, execution, and cleanup.
    ///
    /// # Errors
    ///
    /// Returns [`DirectorError`] when any stage fails; suite cleanups for
    /// completed setups run before the error is returned.
    fn run_category(
        &self,
        category: &ResolvedCategory<'_>,
        paths: &ResolvedPaths,
        workspace: &RunWorkspace,
        assembler: &ConfigAssembler<'_>,
    ) -> Result<ResultSet, DirectorError> {
        tracing::info!(category = %category.name, "starting category batch");
        let dirs = workspace.prepare_category(&category.name)?;
        let mut contexts = Vec::with_capacity(category.suites.len());
        for selected in &category.suites {
            let names: Vec<&str> = selected.tests.iter().map(|case| case.name).collect();
            let suite_dir = workspace.prepare_suite(&dirs, selected.suite.name(), &names)?;
            contexts.push(SuiteContext {
                category_env: dirs.category_env.clone(),
                suite_dir,
            });
        }

        let stems: Vec<String> =
            category.suites.iter().map(|selected| selected.suite.fragment_stem()).collect();
        let merged = paths.category_config_path(&category.name);
        tracing::info!(category = %category.name, path = %merged.display(), "assembling policy config");
        assembler.assemble_category(&category.name, &stems, &merged)?;
        workspace.install_live_policy(&merged, &paths.live_policy_path())?;

        let mut results = ResultSet::new();
        let mut batch_error = None;

        // Setups run in suite-list order; the first failure stops the batch
        // before the monitor starts.
        let mut completed_setups = 0;
        for (selected, ctx) in category.suites.iter().zip(contexts.iter()) {
            tracing::info!(suite = selected.suite.name(), "running suite setup");
            if let Err(err) = selected.suite.setup(ctx) {
                batch_error = Some(DirectorError::from(err));
                break;
            }
            completed_setups += 1;
        }

        if batch_error.is_none() {
            batch_error = self.supervise_batch(category, paths, &dirs, &mut results).err();
        }

        // Cleanups run in suite-list order for every completed setup, on
        // success and during unwinding alike.
        for (selected, ctx) in
            category.suites.iter().zip(contexts.iter()).take(completed_setups)
        {
            tracing::info!(suite = selected.suite.name(), "running suite cleanup");
            if let Err(err) = selected.suite.cleanup(ctx) {
                if batch_error.is_some() {
                    tracing::warn!(
                        suite = selected.suite.name(),
                        error = %err,
                        "cleanup failed while unwinding an earlier error"
                    );
                } else {
                    batch_error = Some(DirectorError::from(err));
                }
            }
        }

        match batch_error {
            Some(err) => Err(err),
            None => Ok(results),
        }
    }

    /// Starts the monitor, executes the batch, and terminates the monitor.
    ///
    /// Termination is attempted whether or not execution failed; the handle's
    /// drop guard backs it up on every remaining path.
    ///
    /// # Errors
    ///
    /// Returns [`DirectorError`] when supervision or a test invocation fails.
    fn supervise_batch(
        &self,
        category: &ResolvedCategory<'_>,
        paths: &ResolvedPaths,
        dirs: &CategoryDirs,
        results: &mut ResultSet,
    ) -> Result<(), DirectorError> {
        tracing::info!("starting security-policy monitor");
        let spec = self.monitor_spec(paths);
        let mut handle = MonitorHandle::start(&spec)?;
        handle.wait_ready(&self.readiness_policy(paths))?;

        tracing::info!("starting test batch");
        let executed = execute_tests(&category.suites, dirs, results);

        tracing::info!("terminating security-policy monitor");
        let terminated = handle.terminate();
        executed?;
        terminated?;
        Ok(())
    }

    /// Builds the monitor spawn spec bound to the synthesized base config.
    fn monitor_spec(&self, paths: &ResolvedPaths) -> MonitorSpec {
        let base_path = paths.base_monitor_config_path(&self.config.monitor.config_name);
        let mut args = self.config.monitor.args.clone();
        args.push(base_path.display().to_string());
        MonitorSpec {
            program: self.config.monitor.command.clone(),
            args,
            workdir: paths.test_env.clone(),
            stdout_log: paths.test_env.join(MONITOR_STDOUT_LOG),
            stderr_log: paths.test_env.join(MONITOR_STDERR_LOG),
        }
    }

    /// Builds the readiness policy from the monitor settings.
    fn readiness_policy(&self, paths: &ResolvedPaths) -> ReadinessPolicy {
        match &self.config.monitor.ready_file {
            Some(ready) => {
                let path = if ready.is_absolute() {
                    ready.clone()
                } else {
                    paths.test_env.join(ready)
                };
                ReadinessPolicy::ReadyFile {
                    path,
                    timeout: Duration::from_millis(self.config.monitor.ready_timeout_ms),
                }
            }
            None => ReadinessPolicy::Warmup(resolve_warmup(Duration::from_millis(
                self.config.monitor.warmup_ms,
            ))),
        }
    }
}

// ============================================================================
// SECTION: Test Execution
// ============================================================================

/// Executes every selected test, suite by suite, in declared order.
///
/// Outcomes are recorded as the invocation returns them. The first failing
/// invocation aborts the remaining tests, leaving outcomes for exactly the
/// tests that completed before it.
///
/// # Errors
///
/// Returns the first [`TestError`] raised by an invocation.
pub fn execute_tests(
    suites: &[SelectedSuite<'_>],
    dirs: &CategoryDirs,
    results: &mut ResultSet,
) -> Result<(), TestError> {
    for selected in suites {
        let suite_dir: PathBuf = dirs.category_tests.join(selected.suite.name());
        for case in &selected.tests {
            tracing::info!(suite = selected.suite.name(), test = case.name, "executing test");
            let ctx = TestContext {
                category_env: dirs.category_env.clone(),
                scratch_dir: suite_dir.join(case.name),
            };
            let outcome = (case.run)(&ctx)?;
            results.insert(case.name, outcome);
        }
    }
    Ok(())
}
