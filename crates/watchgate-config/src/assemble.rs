// crates/watchgate-config/src/assemble.rs
// ============================================================================
// Module: Config Assembly
// Description: Ordered merge of configuration fragments into one output file.
// Purpose: Synthesize monitor and per-category configs through path injection.
// Dependencies: crate::inject
// ============================================================================

//! ## Overview
//! Assembly reads the category fragment first and then each suite's fragment
//! in selection order, injects paths into each raw text, concatenates, and
//! writes the result to a single output path, truncating prior content. A
//! missing fragment is fatal; no partial output is cleaned up and nothing
//! retries. Two concurrent runs against the same output path race; the
//! harness is a single-run-at-a-time design.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::inject::InjectError;
use crate::inject::PathInjector;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Extension shared by every configuration fragment file.
pub const FRAGMENT_EXTENSION: &str = "conf";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Config assembly errors.
///
/// # Invariants
/// - Assembly performs no retries and cleans up no partial output.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A required fragment file does not exist.
    #[error("missing fragment file: {0}")]
    MissingFragment(String),
    /// A fragment file could not be read.
    #[error("fragment read error: {0}")]
    Read(String),
    /// Placeholder injection failed inside a fragment.
    #[error("fragment injection error: {0}")]
    Inject(#[from] InjectError),
    /// The assembled output could not be written.
    #[error("config write error: {0}")]
    Write(String),
}

// ============================================================================
// SECTION: Config Assembler
// ============================================================================

/// Merges path-injected fragments into monitor configuration files.
///
/// # Invariants
/// - Fragment order is the caller's order; assembly never reorders.
pub struct ConfigAssembler<'inj> {
    /// Directory holding every fragment file.
    fragments_dir: PathBuf,
    /// Injector applied to each fragment before concatenation.
    injector: &'inj PathInjector,
}

impl<'inj> ConfigAssembler<'inj> {
    /// Creates an assembler over a fragment directory.
    #[must_use]
    pub fn new(fragments_dir: &Path, injector: &'inj PathInjector) -> Self {
        Self {
            fragments_dir: fragments_dir.to_path_buf(),
            injector,
        }
    }

    /// Assembles one category's merged configuration.
    ///
    /// Reads `<category>.conf` first, then each suite fragment
    /// `<stem>.conf` in the given order, streaming the injected text into
    /// `output`. A failure mid-assembly leaves the partially written output
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] when a fragment is missing or unreadable,
    /// injection fails, or the output cannot be written.
    pub fn assemble_category(
        &self,
        category: &str,
        suite_stems: &[String],
        output: &Path,
    ) -> Result<(), AssemblyError> {
        let mut out =
            File::create(output).map_err(|err| AssemblyError::Write(err.to_string()))?;
        self.append_fragment(&mut out, category)?;
        for stem in suite_stems {
            self.append_fragment(&mut out, stem)?;
        }
        Ok(())
    }

    /// Reads, injects, and appends one fragment to the open output file.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] when reading, injection, or writing fails.
    fn append_fragment(&self, out: &mut File, stem: &str) -> Result<(), AssemblyError> {
        let injected = self.read_fragment(stem)?;
        out.write_all(injected.as_bytes())
            .map_err(|err| AssemblyError::Write(err.to_string()))
    }

    /// Synthesizes the base monitor configuration from its canonical file.
    ///
    /// The source is addressed by its full filename rather than a stem, and
    /// is copied through path injection to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] when the source is missing or unreadable,
    /// injection fails, or the output cannot be written.
    pub fn synthesize_base(&self, source_name: &str, output: &Path) -> Result<(), AssemblyError> {
        let source = self.fragments_dir.join(source_name);
        let injected = self.read_fragment_file(&source)?;
        fs::write(output, injected).map_err(|err| AssemblyError::Write(err.to_string()))
    }

    /// Reads and injects one fragment addressed by stem.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] when reading or injection fails.
    fn read_fragment(&self, stem: &str) -> Result<String, AssemblyError> {
        let path = self.fragments_dir.join(format!("{stem}.{FRAGMENT_EXTENSION}"));
        self.read_fragment_file(&path)
    }

    /// Reads and injects one fragment addressed by full path.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] when reading or injection fails.
    fn read_fragment_file(&self, path: &Path) -> Result<String, AssemblyError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                AssemblyError::MissingFragment(path.display().to_string())
            } else {
                AssemblyError::Read(err.to_string())
            }
        })?;
        Ok(self.injector.inject(&raw)?)
    }
}
