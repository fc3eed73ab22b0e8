//! Stable exit codes for pdp CLI commands.

/// Command succeeded; for `run`, the whole subtree succeeded.
pub const OK: i32 = 0;
/// Validation failure, uninitialized project, usage error, unknown task, or
/// aggregate task failure.
pub const FAILURE: i32 = 1;
