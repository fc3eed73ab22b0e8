//! Test-only helpers: throwaway projects on disk and in-memory tree builders.

use std::path::Path;

use anyhow::Result;
use serde_yaml::Value;
use tempfile::TempDir;

use crate::io::descriptor::{Descriptor, DescriptorKind};
use crate::io::project::{init_project, load_project};
use crate::tree::Node;

/// Temporary directory holding an initialized project named `test`.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        init_project(dir.path(), Some("test"))?;
        Ok(Self { dir })
    }

    pub fn root_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Rehydrate the tree from disk.
    pub fn load(&self) -> Result<Node> {
        load_project(self.dir.path())
    }
}

/// Set the entrypoint of the task descriptor living in `dir`.
pub fn set_entrypoint(dir: &Path, command: &str) -> Result<()> {
    let mut descriptor = Descriptor::open(DescriptorKind::Task, dir);
    descriptor.update_field("entrypoint", Value::String(command.to_string()))
}

/// In-memory node with no children, rooted under a fake `/project` path.
/// For pure tests only; nothing is touched on disk.
pub fn node(name: &str) -> Node {
    Node::task(name, Path::new("/project"))
}

/// In-memory node with children, re-based so child directories nest under
/// the parent's.
pub fn node_with_children(name: &str, children: Vec<Node>) -> Node {
    let mut parent = node(name);
    parent.children = children;
    let dir = parent.dir.clone();
    for child in &mut parent.children {
        rebase(child, &dir);
    }
    parent
}

fn rebase(node: &mut Node, parent_dir: &Path) {
    node.dir = parent_dir.join(&node.name);
    let dir = node.dir.clone();
    for child in &mut node.children {
        rebase(child, &dir);
    }
}
