/// Run configuration.
pub mod config;
/// Frame, rate and resolution value types.
pub mod core;
/// Precision warnings and their receivers.
pub mod diagnostics;
/// Error taxonomy.
pub mod error;
