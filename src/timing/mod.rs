//! Frame timing: how annotation frames map to displayed numbers and timecodes.

/// Timeline planning and indicator policy.
pub mod planner;
/// Millisecond timecodes.
pub mod timecode;
