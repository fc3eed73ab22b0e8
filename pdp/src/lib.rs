//! Project scaffolding and recursive task runner.
//!
//! pdp manages a tree of named tasks. Every node (the project root or a
//! task) is backed by a directory holding a YAML descriptor (`pdp.yml` at
//! the root, `task.yml` per task) and, while childless, the three standard
//! subfolders `input`/`output`/`src`. The tree nests arbitrarily deep and is
//! rehydrated purely from the descriptors on disk.
//!
//! The architecture keeps a strict separation:
//!
//! - **[`core`]**: pure, deterministic logic (location resolution,
//!   enumeration, rendering). No I/O, fully testable in isolation.
//! - **[`io`]**: side-effecting operations (descriptor files, scaffolding,
//!   process execution).
//!
//! The CLI in `main.rs` coordinates the two.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tree;
