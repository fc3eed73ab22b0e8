//! The task tree: one [`Node`] per project root or task.

use std::path::{Path, PathBuf};

use crate::io::descriptor::{Descriptor, DescriptorKind};

/// A project root or task, represented uniformly.
///
/// Constructed from a name and directory; [`scaffold`](crate::io::scaffold)
/// materializes the directory, descriptor, and children. Child order is the
/// declaration order in the descriptor and is significant for traversal
/// numbering.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub dir: PathBuf,
    pub descriptor: Descriptor,
    pub children: Vec<Node>,
}

impl Node {
    /// Construct the (unscaffolded) project root for `dir`.
    ///
    /// The name comes from the root descriptor's `name` key when present,
    /// otherwise from the directory's file name.
    pub fn root(dir: PathBuf) -> Self {
        let descriptor = Descriptor::open(DescriptorKind::Root, &dir);
        let name = descriptor
            .name()
            .map(str::to_string)
            .or_else(|| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "project".to_string());
        Self {
            name,
            dir,
            descriptor,
            children: Vec::new(),
        }
    }

    /// Construct an (unscaffolded) task named `name` under `parent_dir`.
    pub fn task(name: &str, parent_dir: &Path) -> Self {
        let dir = parent_dir.join(name);
        let descriptor = Descriptor::open(DescriptorKind::Task, &dir);
        Self {
            name: name.to_string(),
            dir,
            descriptor,
            children: Vec::new(),
        }
    }

    /// The shell command to run at this level, if any.
    pub fn entrypoint(&self) -> Option<&str> {
        self.descriptor.entrypoint()
    }

    /// Linear search of direct children by name.
    pub fn resolve_child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn resolve_child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    /// First node named `name` anywhere in this subtree, pre-order.
    ///
    /// Name collisions across depths resolve to the pre-order-first match.
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_by_name(name))
    }
}
