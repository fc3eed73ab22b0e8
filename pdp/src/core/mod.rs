//! Pure, deterministic logic over an in-memory task tree.
//!
//! Core modules are free of I/O side effects and fully testable in
//! isolation.

pub mod locate;
pub mod render;
