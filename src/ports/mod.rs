//! Collaborator interfaces for the steps that run outside this crate.

/// Composition engine contract and the end-to-end mezzanine run.
pub mod compose;
/// AV-sync beep/flash generator contract.
pub mod sync_pattern;
