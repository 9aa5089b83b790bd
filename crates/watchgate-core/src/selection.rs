// crates/watchgate-core/src/selection.rs
// ============================================================================
// Module: Test Selection Codec
// Description: Versioned serialization of the host's test selection.
// Purpose: Provide strict, lossless decoding of the cross-process payload.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The host chooses which tests and suite groups should run and hands the
//! guest a serialized selection file. The payload is an explicit, versioned
//! JSON schema of two ordered name lists, decoded fail-closed: size, encoding,
//! version, and name limits are all enforced before any run side effect.
//! Selection inputs are untrusted; decoding never touches the filesystem
//! beyond the payload file itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Schema version accepted by this decoder.
pub const SELECTION_SCHEMA_VERSION: u32 = 1;
/// Maximum selection payload size in bytes.
pub(crate) const MAX_SELECTION_FILE_SIZE: usize = 64 * 1024;
/// Maximum number of names in either selection list.
pub(crate) const MAX_SELECTION_NAMES: usize = 1024;
/// Maximum length of a single selected name.
pub(crate) const MAX_SELECTION_NAME_LENGTH: usize = 128;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Selection decoding and encoding errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// I/O failure while reading or writing the payload.
    #[error("selection io error: {0}")]
    Io(String),
    /// JSON parsing error.
    #[error("selection parse error: {0}")]
    Parse(String),
    /// Invalid selection data.
    #[error("invalid selection: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Wire Payload
// ============================================================================

/// On-disk selection payload.
///
/// # Invariants
/// - `version` must equal [`SELECTION_SCHEMA_VERSION`] for this decoder.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SelectionPayload {
    /// Schema version of the payload.
    version: u32,
    /// Ordered test names; empty selects every test of the chosen suites.
    tests: Vec<String>,
    /// Ordered suite or category names.
    groups: Vec<String>,
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// The host's decoded test selection.
///
/// # Invariants
/// - Name lists are validated against length and count limits.
/// - Decoded once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Ordered test names; empty selects every test of the chosen suites.
    pub tests: Vec<String>,
    /// Ordered suite or category names.
    pub groups: Vec<String>,
}

impl Selection {
    /// Creates a validated selection from name lists.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Invalid`] when a list or name exceeds limits.
    pub fn new(tests: Vec<String>, groups: Vec<String>) -> Result<Self, SelectionError> {
        let selection = Self {
            tests,
            groups,
        };
        selection.validate()?;
        Ok(selection)
    }

    /// Decodes a selection from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] when parsing or validation fails.
    pub fn decode_str(payload: &str) -> Result<Self, SelectionError> {
        if payload.len() > MAX_SELECTION_FILE_SIZE {
            return Err(SelectionError::Invalid("selection payload exceeds size limit".to_string()));
        }
        let parsed: SelectionPayload =
            serde_json::from_str(payload).map_err(|err| SelectionError::Parse(err.to_string()))?;
        if parsed.version != SELECTION_SCHEMA_VERSION {
            return Err(SelectionError::Invalid(format!(
                "unsupported selection version {}",
                parsed.version
            )));
        }
        Self::new(parsed.tests, parsed.groups)
    }

    /// Decodes a selection from a payload file.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] when reading, parsing, or validation fails.
    pub fn decode_file(path: &Path) -> Result<Self, SelectionError> {
        let bytes = fs::read(path).map_err(|err| SelectionError::Io(err.to_string()))?;
        if bytes.len() > MAX_SELECTION_FILE_SIZE {
            return Err(SelectionError::Invalid("selection payload exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| SelectionError::Invalid("selection payload must be utf-8".to_string()))?;
        Self::decode_str(content)
    }

    /// Encodes the selection as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Parse`] when serialization fails.
    pub fn encode(&self) -> Result<String, SelectionError> {
        let payload = SelectionPayload {
            version: SELECTION_SCHEMA_VERSION,
            tests: self.tests.clone(),
            groups: self.groups.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|err| SelectionError::Parse(err.to_string()))
    }

    /// Encodes the selection into a payload file, truncating prior content.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] when serialization or writing fails.
    pub fn encode_file(&self, path: &Path) -> Result<(), SelectionError> {
        let encoded = self.encode()?;
        fs::write(path, encoded).map_err(|err| SelectionError::Io(err.to_string()))
    }

    /// Validates name list limits.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::Invalid`] when a limit is exceeded.
    fn validate(&self) -> Result<(), SelectionError> {
        if self.tests.len() > MAX_SELECTION_NAMES {
            return Err(SelectionError::Invalid("too many selected tests".to_string()));
        }
        if self.groups.len() > MAX_SELECTION_NAMES {
            return Err(SelectionError::Invalid("too many selected groups".to_string()));
        }
        for name in self.tests.iter().chain(self.groups.iter()) {
            if name.is_empty() {
                return Err(SelectionError::Invalid("selected name must not be empty".to_string()));
            }
            if name.len() > MAX_SELECTION_NAME_LENGTH {
                return Err(SelectionError::Invalid(format!(
                    "selected name exceeds max length: {name}"
                )));
            }
        }
        Ok(())
    }
}
