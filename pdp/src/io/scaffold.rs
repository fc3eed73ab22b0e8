//! Directory and descriptor materialization for task trees.
//!
//! Scaffolding is how a tree is rehydrated: there is no separate index, the
//! nested descriptors on disk are the whole truth. Construction runs off an
//! explicit worklist (children always land at higher arena indices than
//! their parent) so very deep trees cannot exhaust the stack.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::tree::Node;

/// The standard subfolders every childless task owns.
pub const LEAF_FOLDERS: [&str; 3] = ["input", "output", "src"];

struct Slot {
    node: Node,
    children: Vec<usize>,
}

/// Materialize `seed` and its whole declared subtree, returning the built tree.
///
/// For each node: ensure the directory exists, initialize the descriptor,
/// then construct every child the descriptor declares. Nodes that end up
/// with zero children get the three standard leaf folders; a node scaffolded
/// with pre-declared children never does. Idempotent over an already
/// scaffolded tree.
pub fn scaffold(seed: Node) -> Result<Node> {
    let mut slots = vec![Slot {
        node: seed,
        children: Vec::new(),
    }];
    let mut work = vec![0usize];

    while let Some(index) = work.pop() {
        materialize(&mut slots[index].node)?;
        let declared = slots[index].node.descriptor.child_names();
        if declared.is_empty() {
            create_leaf_folders(&slots[index].node.dir)?;
            continue;
        }
        for name in declared {
            let child = Node::task(&name, &slots[index].node.dir);
            let child_index = slots.len();
            slots.push(Slot {
                node: child,
                children: Vec::new(),
            });
            slots[index].children.push(child_index);
            work.push(child_index);
        }
    }

    assemble(slots)
}

/// Create task `name` under `parent`: record it in the parent's descriptor,
/// scaffold it, append it to the in-memory children. Duplicate names are a
/// no-op. A parent gaining its first child sheds its now-meaningless leaf
/// folders, provided they are empty.
pub fn create_child(parent: &mut Node, name: &str) -> Result<()> {
    if parent.resolve_child(name).is_some() {
        debug!(parent = %parent.name, task = name, "task already exists");
        return Ok(());
    }
    // descriptor first, so the declared list never lags the in-memory tree
    parent.descriptor.add_child(name)?;
    let child = scaffold(Node::task(name, &parent.dir))?;
    parent.children.push(child);
    shed_leaf_folders(&parent.dir);
    Ok(())
}

fn materialize(node: &mut Node) -> Result<()> {
    fs::create_dir_all(&node.dir)
        .with_context(|| format!("create directory {}", node.dir.display()))?;
    node.descriptor.initialize()
}

fn create_leaf_folders(dir: &Path) -> Result<()> {
    for folder in LEAF_FOLDERS {
        let path = dir.join(folder);
        fs::create_dir_all(&path)
            .with_context(|| format!("create folder {}", path.display()))?;
    }
    Ok(())
}

/// Remove the standard leaf folders of a node that now has children.
///
/// All-or-nothing: if any of the three holds user files, all of them stay.
/// Already-missing folders count as empty and are tolerated on removal.
fn shed_leaf_folders(dir: &Path) {
    let all_empty = LEAF_FOLDERS
        .iter()
        .all(|folder| dir_is_empty_or_missing(&dir.join(folder)));
    if !all_empty {
        debug!(dir = %dir.display(), "leaf folders hold user files, leaving them in place");
        return;
    }
    for folder in LEAF_FOLDERS {
        let path = dir.join(folder);
        if let Err(err) = fs::remove_dir(&path)
            && err.kind() != ErrorKind::NotFound
        {
            debug!(path = %path.display(), %err, "leaving leaf folder in place");
        }
    }
}

fn dir_is_empty_or_missing(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

/// Move arena nodes into their parents' `children` vectors, preserving
/// declared order. Children carry higher indices than their parents, so a
/// reverse sweep settles every subtree before its parent is taken.
fn assemble(slots: Vec<Slot>) -> Result<Node> {
    let child_lists: Vec<Vec<usize>> = slots.iter().map(|slot| slot.children.clone()).collect();
    let mut nodes: Vec<Option<Node>> = slots.into_iter().map(|slot| Some(slot.node)).collect();

    for index in (0..nodes.len()).rev() {
        let mut children = Vec::with_capacity(child_lists[index].len());
        for &child_index in &child_lists[index] {
            let child = nodes[child_index]
                .take()
                .ok_or_else(|| anyhow!("task tree arena corrupted"))?;
            children.push(child);
        }
        if let Some(node) = nodes[index].as_mut() {
            node.children = children;
        }
    }

    nodes[0]
        .take()
        .ok_or_else(|| anyhow!("task tree arena lost its root"))
}
