// crates/watchgate-config/src/inject.rs
// ============================================================================
// Module: Path Injection
// Description: Placeholder substitution inside configuration fragments.
// Purpose: Rewrite `@{name}` placeholders into concrete filesystem paths.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Fragments are written against symbolic locations so the same fragment works
//! under any testing root. Injection is a pure text transform: `@{name}` is
//! replaced by the mapped path, an unknown name fails closed, and text without
//! placeholders passes through unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::ResolvedPaths;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Opening marker of a placeholder.
const PLACEHOLDER_OPEN: &str = "@{";
/// Closing marker of a placeholder.
const PLACEHOLDER_CLOSE: char = '}';

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Path injection errors.
///
/// # Invariants
/// - Injection never partially rewrites: any error leaves no output.
#[derive(Debug, Error)]
pub enum InjectError {
    /// A placeholder names no mapped path.
    #[error("unknown path placeholder: {0}")]
    UnknownPlaceholder(String),
    /// A placeholder is opened but never closed.
    #[error("unterminated path placeholder")]
    Unterminated,
}

// ============================================================================
// SECTION: Path Injector
// ============================================================================

/// Pure placeholder-to-path substitution over fragment text.
///
/// # Invariants
/// - Mappings are fixed for the lifetime of one run.
#[derive(Debug, Clone, Default)]
pub struct PathInjector {
    /// Placeholder name to substituted value.
    mappings: BTreeMap<String, String>,
}

impl PathInjector {
    /// Creates an injector for the standard layout placeholders.
    ///
    /// Maps `testing_root`, `fragments`, `test_env`, and `tests` to the
    /// resolved run directories.
    #[must_use]
    pub fn from_paths(paths: &ResolvedPaths) -> Self {
        let mut mappings = BTreeMap::new();
        mappings.insert("testing_root".to_string(), paths.testing_root.display().to_string());
        mappings.insert("fragments".to_string(), paths.fragments_dir.display().to_string());
        mappings.insert("test_env".to_string(), paths.test_env.display().to_string());
        mappings.insert("tests".to_string(), paths.tests_dir.display().to_string());
        Self {
            mappings,
        }
    }

    /// Adds or replaces one placeholder mapping.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.mappings.insert(name.to_string(), value.to_string());
    }

    /// Rewrites every placeholder in the raw fragment text.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError`] for unknown or unterminated placeholders.
    pub fn inject(&self, raw: &str) -> Result<String, InjectError> {
        let mut output = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(open) = rest.find(PLACEHOLDER_OPEN) {
            output.push_str(&rest[..open]);
            let after_open = &rest[open + PLACEHOLDER_OPEN.len()..];
            let Some(close) = after_open.find(PLACEHOLDER_CLOSE) else {
                return Err(InjectError::Unterminated);
            };
            let name = &after_open[..close];
            match self.mappings.get(name) {
                Some(value) => output.push_str(value),
                None => return Err(InjectError::UnknownPlaceholder(name.to_string())),
            }
            rest = &after_open[close + PLACEHOLDER_CLOSE.len_utf8()..];
        }
        output.push_str(rest);
        Ok(output)
    }
}
