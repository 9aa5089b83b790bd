// crates/watchgate-config/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Configuration loading and validation for the Watchgate harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed before any run side effect.
//! The file names the testing root, the fragment directory, and the monitor
//! launch settings; everything else the harness touches derives from these.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "watchgate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "WATCHGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum monitor warm-up interval in milliseconds.
pub(crate) const MIN_WARMUP_MS: u64 = 100;
/// Maximum monitor warm-up interval in milliseconds.
pub(crate) const MAX_WARMUP_MS: u64 = 60_000;
/// Minimum readiness-file wait in milliseconds.
pub(crate) const MIN_READY_TIMEOUT_MS: u64 = 500;
/// Maximum readiness-file wait in milliseconds.
pub(crate) const MAX_READY_TIMEOUT_MS: u64 = 300_000;
/// Maximum number of monitor command arguments.
pub(crate) const MAX_MONITOR_ARGS: usize = 64;
/// Well-known filename of the live per-category policy configuration.
pub const POLICY_CONFIG_NAME: &str = "policy.conf";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Harness configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Watchgate harness configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HarnessConfig {
    /// Filesystem layout of the testing root.
    pub paths: PathsConfig,
    /// Monitor subprocess launch settings.
    pub monitor: MonitorConfig,
}

/// Filesystem layout configuration.
///
/// # Invariants
/// - `testing_root` is absolute; the remaining directories resolve under it
///   when given as relative paths.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Absolute testing root owned exclusively by one run at a time.
    pub testing_root: PathBuf,
    /// Directory holding configuration fragments, default `fragments`.
    #[serde(default = "default_fragments_dir")]
    pub fragments_dir: PathBuf,
    /// Runtime environment directory, default `test_env`.
    #[serde(default = "default_test_env")]
    pub test_env: PathBuf,
    /// Per-suite scaffolding directory, default `tests`.
    #[serde(default = "default_tests_dir")]
    pub tests_dir: PathBuf,
}

/// Monitor subprocess launch settings.
///
/// # Invariants
/// - `command` is non-empty; `config_name` is a single path component.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Program started as the security-policy monitor.
    pub command: String,
    /// Arguments passed before the base configuration path.
    #[serde(default)]
    pub args: Vec<String>,
    /// Filename of the canonical base monitor configuration fragment.
    #[serde(default = "default_monitor_config_name")]
    pub config_name: String,
    /// Warm-up interval granted to the monitor after spawn, in milliseconds.
    #[serde(default = "default_warmup_ms")]
    pub warmup_ms: u64,
    /// Optional file whose appearance signals monitor readiness.
    #[serde(default)]
    pub ready_file: Option<PathBuf>,
    /// Deadline for the readiness file to appear, in milliseconds.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
}

/// Default fragments directory.
fn default_fragments_dir() -> PathBuf {
    PathBuf::from("fragments")
}

/// Default test environment directory.
fn default_test_env() -> PathBuf {
    PathBuf::from("test_env")
}

/// Default per-suite scaffolding directory.
fn default_tests_dir() -> PathBuf {
    PathBuf::from("tests")
}

/// Default base monitor configuration filename.
fn default_monitor_config_name() -> String {
    "monitor.conf".to_string()
}

/// Default warm-up interval in milliseconds.
const fn default_warmup_ms() -> u64 {
    1_000
}

/// Default readiness-file deadline in milliseconds.
const fn default_ready_timeout_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl HarnessConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then [`CONFIG_ENV_VAR`], then
    /// `watchgate.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.paths.validate()?;
        self.monitor.validate()?;
        Ok(())
    }
}

/// Resolves the effective config path from argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    if let Some(explicit) = path {
        return explicit.to_path_buf();
    }
    if let Ok(from_env) = env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(from_env);
    }
    PathBuf::from(DEFAULT_CONFIG_NAME)
}

/// Validates path length limits before touching the filesystem.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when a limit is exceeded.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let total = path.as_os_str().len();
    if total > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if let Component::Normal(part) = component {
            if part.len() > MAX_PATH_COMPONENT_LENGTH {
                return Err(ConfigError::Invalid("config path component too long".to_string()));
            }
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

impl PathsConfig {
    /// Validates the filesystem layout settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the layout is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.testing_root.is_absolute() {
            return Err(ConfigError::Invalid("testing_root must be absolute".to_string()));
        }
        validate_path(&self.testing_root)
            .map_err(|_| ConfigError::Invalid("testing_root exceeds path limits".to_string()))?;
        Ok(())
    }

    /// Resolves the layout into absolute directories under the testing root.
    #[must_use]
    pub fn resolve(&self) -> ResolvedPaths {
        ResolvedPaths {
            fragments_dir: self.join_root(&self.fragments_dir),
            test_env: self.join_root(&self.test_env),
            tests_dir: self.join_root(&self.tests_dir),
            testing_root: self.testing_root.clone(),
        }
    }

    /// Resolves one directory entry against the testing root.
    fn join_root(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() { dir.to_path_buf() } else { self.testing_root.join(dir) }
    }
}

/// Absolute filesystem layout of one run.
///
/// # Invariants
/// - All directories are absolute once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Absolute testing root.
    pub testing_root: PathBuf,
    /// Directory holding configuration fragments.
    pub fragments_dir: PathBuf,
    /// Runtime environment directory read by the monitor.
    pub test_env: PathBuf,
    /// Per-suite scaffolding directory.
    pub tests_dir: PathBuf,
}

impl ResolvedPaths {
    /// Returns the merged config path for a category.
    #[must_use]
    pub fn category_config_path(&self, category: &str) -> PathBuf {
        self.tests_dir.join(category).join(POLICY_CONFIG_NAME)
    }

    /// Returns the live policy config path the monitor reads.
    #[must_use]
    pub fn live_policy_path(&self) -> PathBuf {
        self.test_env.join(POLICY_CONFIG_NAME)
    }

    /// Returns the synthesized base monitor config path.
    #[must_use]
    pub fn base_monitor_config_path(&self, config_name: &str) -> PathBuf {
        self.test_env.join(config_name)
    }
}

// ============================================================================
// SECTION: Monitor Validation
// ============================================================================

impl MonitorConfig {
    /// Validates the monitor launch settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a setting is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command.trim().is_empty() {
            return Err(ConfigError::Invalid("monitor command must not be empty".to_string()));
        }
        if self.args.len() > MAX_MONITOR_ARGS {
            return Err(ConfigError::Invalid("too many monitor arguments".to_string()));
        }
        if !is_single_component(&self.config_name) {
            return Err(ConfigError::Invalid(
                "monitor config_name must be a bare filename".to_string(),
            ));
        }
        if self.warmup_ms < MIN_WARMUP_MS || self.warmup_ms > MAX_WARMUP_MS {
            return Err(ConfigError::Invalid(format!(
                "monitor warmup_ms must be within {MIN_WARMUP_MS}..={MAX_WARMUP_MS}"
            )));
        }
        if self.ready_timeout_ms < MIN_READY_TIMEOUT_MS
            || self.ready_timeout_ms > MAX_READY_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(format!(
                "monitor ready_timeout_ms must be within {MIN_READY_TIMEOUT_MS}..={MAX_READY_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Returns true when the name is one normal path component.
fn is_single_component(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_PATH_COMPONENT_LENGTH {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}
