// crates/watchgate-monitor/src/supervisor.rs
// ============================================================================
// Module: Monitor Supervisor
// Description: Spawn, readiness wait, and termination of the monitor process.
// Purpose: Guarantee every started monitor is matched by a termination.
// Dependencies: std::process, tracing
// ============================================================================

//! ## Overview
//! The supervisor starts the monitor bound to the assembled configuration and
//! hands back an owning handle. The monitor publishes no readiness protocol,
//! so readiness is a supervised warm-up window: the child is polled during the
//! interval and a premature exit fails the start instead of letting tests run
//! against a dead policy engine. When the monitor is configured to touch a
//! readiness file, the supervisor polls for that file until a deadline.
//! Dropping the handle kills the child, so termination holds on every exit
//! path; explicit [`MonitorHandle::terminate`] additionally reports failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::process::Child;
use std::process::Command;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable raising the minimum warm-up interval, in milliseconds.
pub const WARMUP_ENV_VAR: &str = "WATCHGATE_MONITOR_WARMUP_MS";
/// Poll interval for readiness and liveness checks.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Monitor supervision errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The monitor process could not be spawned.
    #[error("monitor spawn error: {0}")]
    Spawn(String),
    /// A monitor log file could not be created.
    #[error("monitor log error: {0}")]
    Log(String),
    /// The monitor exited before the readiness wait completed.
    #[error("monitor exited during warm-up: {0}")]
    EarlyExit(String),
    /// The readiness file did not appear before the deadline.
    #[error("monitor readiness timeout: {0}")]
    ReadyTimeout(String),
    /// The monitor could not be terminated cleanly.
    #[error("monitor terminate error: {0}")]
    Terminate(String),
}

// ============================================================================
// SECTION: Spawn Specification
// ============================================================================

/// Everything needed to start the monitor for one category batch.
///
/// # Invariants
/// - `workdir` exists and contains the assembled configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSpec {
    /// Program to execute.
    pub program: String,
    /// Arguments, typically ending with the base configuration path.
    pub args: Vec<String>,
    /// Working directory the monitor resolves relative paths from.
    pub workdir: PathBuf,
    /// File capturing the monitor's stdout.
    pub stdout_log: PathBuf,
    /// File capturing the monitor's stderr.
    pub stderr_log: PathBuf,
}

/// How the supervisor decides the monitor is ready.
///
/// # Invariants
/// - Readiness is a heuristic; the monitor offers no handshake protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessPolicy {
    /// Supervised warm-up: wait the interval, failing fast on early exit.
    Warmup(Duration),
    /// Poll for a file the monitor touches once its policy engine is up.
    ReadyFile {
        /// File whose appearance signals readiness.
        path: PathBuf,
        /// Deadline for the file to appear.
        timeout: Duration,
    },
}

// ============================================================================
// SECTION: Monitor Handle
// ============================================================================

/// Owning handle over the running monitor subprocess.
///
/// # Invariants
/// - Exactly one handle exists per started monitor.
/// - Dropping the handle kills and reaps the child if not yet terminated.
#[derive(Debug)]
pub struct MonitorHandle {
    /// The supervised child process.
    child: Child,
    /// Set once the child has been reaped.
    terminated: bool,
}

impl MonitorHandle {
    /// Spawns the monitor process described by the spec.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] when log files cannot be created or the
    /// process fails to spawn.
    pub fn start(spec: &MonitorSpec) -> Result<Self, MonitorError> {
        let stdout_log = File::create(&spec.stdout_log)
            .map_err(|err| MonitorError::Log(err.to_string()))?;
        let stderr_log = File::create(&spec.stderr_log)
            .map_err(|err| MonitorError::Log(err.to_string()))?;
        let child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_log))
            .stderr(Stdio::from(stderr_log))
            .spawn()
            .map_err(|err| MonitorError::Spawn(format!("{}: {err}", spec.program)))?;
        tracing::debug!(program = %spec.program, pid = child.id(), "monitor spawned");
        Ok(Self {
            child,
            terminated: false,
        })
    }

    /// Returns the monitor's process identifier.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Blocks until the readiness policy is satisfied.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::EarlyExit`] when the child exits during the
    /// wait and [`MonitorError::ReadyTimeout`] when the readiness file never
    /// appears.
    pub fn wait_ready(&mut self, policy: &ReadinessPolicy) -> Result<(), MonitorError> {
        match policy {
            ReadinessPolicy::Warmup(interval) => self.wait_warmup(*interval),
            ReadinessPolicy::ReadyFile {
                path,
                timeout,
            } => self.wait_ready_file(path, *timeout),
        }
    }

    /// Waits out the warm-up interval while checking child liveness.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::EarlyExit`] when the child exits early.
    fn wait_warmup(&mut self, interval: Duration) -> Result<(), MonitorError> {
        let start = Instant::now();
        loop {
            self.check_alive()?;
            if start.elapsed() >= interval {
                return Ok(());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Polls for the readiness file until the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::EarlyExit`] on premature exit and
    /// [`MonitorError::ReadyTimeout`] when the deadline passes.
    fn wait_ready_file(&mut self, path: &Path, timeout: Duration) -> Result<(), MonitorError> {
        let start = Instant::now();
        let mut attempts = 0_u32;
        loop {
            attempts = attempts.saturating_add(1);
            self.check_alive()?;
            if path.exists() {
                return Ok(());
            }
            if start.elapsed() > timeout {
                return Err(MonitorError::ReadyTimeout(format!(
                    "{} absent after {attempts} attempts",
                    path.display()
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Fails when the child has already exited.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::EarlyExit`] carrying the exit status.
    fn check_alive(&mut self) -> Result<(), MonitorError> {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.terminated = true;
                Err(MonitorError::EarlyExit(status.to_string()))
            }
            Ok(None) => Ok(()),
            Err(err) => Err(MonitorError::EarlyExit(err.to_string())),
        }
    }

    /// Terminates the monitor and reaps the child.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Terminate`] when the kill or reap fails; a
    /// child that already exited terminates successfully.
    pub fn terminate(mut self) -> Result<(), MonitorError> {
        if let Err(err) = self.child.kill() {
            if err.kind() != ErrorKind::InvalidInput {
                return Err(MonitorError::Terminate(err.to_string()));
            }
        }
        match self.child.wait() {
            Ok(status) => {
                self.terminated = true;
                tracing::debug!(status = %status, "monitor terminated");
                Ok(())
            }
            Err(err) => Err(MonitorError::Terminate(err.to_string())),
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        if !self.terminated {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

// ============================================================================
// SECTION: Warm-Up Resolution
// ============================================================================

/// Returns the effective warm-up interval, honoring [`WARMUP_ENV_VAR`].
///
/// The override acts as a minimum so slow environments can lengthen the
/// configured warm-up without editing config files; an unparsable value is
/// ignored with a warning.
#[must_use]
pub fn resolve_warmup(requested: Duration) -> Duration {
    match env::var(WARMUP_ENV_VAR) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(millis) if millis > 0 => requested.max(Duration::from_millis(millis)),
            _ => {
                tracing::warn!(value = %raw, "ignoring unparsable warm-up override");
                requested
            }
        },
        Err(_) => requested,
    }
}
