// crates/watchgate-suites/src/lib.rs
// ============================================================================
// Module: Watchgate Suites Library
// Description: Built-in conformance suites and their registration entry point.
// Purpose: Provide the syscall and filesystem-object probe suites.
// Dependencies: crate::{fileops, processops, dirops}, watchgate-core
// ============================================================================

//! ## Overview
//! The built-in suites probe the operations a security-policy monitor
//! typically governs: file access, process creation, and directory
//! manipulation. Each probe performs the operation and reports the observable
//! result as a `"true"`/`"false"` outcome string; what the monitor should have
//! allowed or denied is the concern of the policy fragments, not of the
//! probes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dirops;
pub mod fileops;
pub mod processops;

// ============================================================================
// SECTION: Imports
// ============================================================================

use watchgate_core::RegistryError;
use watchgate_core::SuiteRegistry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dirops::DirOps;
pub use fileops::FileOps;
pub use processops::ProcessOps;

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers every built-in suite into the given registry.
///
/// Safe to call once per freshly constructed registry.
///
/// # Errors
///
/// Returns [`RegistryError`] when a suite name is already taken.
pub fn register_all(registry: &mut SuiteRegistry) -> Result<(), RegistryError> {
    registry.register(Box::new(FileOps))?;
    registry.register(Box::new(ProcessOps))?;
    registry.register(Box::new(DirOps))?;
    Ok(())
}
