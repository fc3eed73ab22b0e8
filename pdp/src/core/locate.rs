//! Current-task resolution from the process working directory.
//!
//! The working directory is taken relative to the project root: an empty
//! relative path means the root itself is current; otherwise the last path
//! component is matched by name against tasks anywhere in the tree. Matching
//! is by name, not full path, so two tasks sharing a name at different
//! depths resolve to the pre-order-first one.

use std::path::Path;

use crate::tree::Node;

/// Node names from the root (exclusive) down to the current node.
///
/// `Some(vec![])` means the root is current; `None` means no current task.
pub fn current_path(root: &Node, cwd: &Path) -> Option<Vec<String>> {
    let rel = cwd.strip_prefix(&root.dir).ok()?;
    if rel.as_os_str().is_empty() {
        return Some(Vec::new());
    }
    let name = rel.file_name()?.to_str()?;
    name_path(root, name)
}

/// The current node itself, if any.
pub fn current_node<'a>(root: &'a Node, cwd: &Path) -> Option<&'a Node> {
    let path = current_path(root, cwd)?;
    node_at(root, &path)
}

/// Follow a name path from the root via direct-child resolution.
pub fn node_at<'a>(root: &'a Node, path: &[String]) -> Option<&'a Node> {
    let mut node = root;
    for name in path {
        node = node.resolve_child(name)?;
    }
    Some(node)
}

pub fn node_at_mut<'a>(root: &'a mut Node, path: &[String]) -> Option<&'a mut Node> {
    let mut node = root;
    for name in path {
        node = node.resolve_child_mut(name)?;
    }
    Some(node)
}

/// Pre-order search for `name` among the root's descendants, returning the
/// name path to the first match.
fn name_path(root: &Node, name: &str) -> Option<Vec<String>> {
    for child in &root.children {
        if child.name == name {
            return Some(vec![child.name.clone()]);
        }
        if let Some(mut path) = name_path(child, name) {
            path.insert(0, child.name.clone());
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{node, node_with_children};

    fn sample_tree() -> Node {
        // rooted at ./root on a fake path; locate only compares paths
        node_with_children(
            "root",
            vec![
                node("hello"),
                node_with_children("world", vec![node("sub1")]),
            ],
        )
    }

    #[test]
    fn root_is_current_at_the_root_directory() {
        let tree = sample_tree();
        let path = current_path(&tree, &tree.dir).expect("current");
        assert!(path.is_empty());
        assert_eq!(current_node(&tree, &tree.dir).expect("node").name, "root");
    }

    #[test]
    fn nested_task_resolves_by_last_component() {
        let tree = sample_tree();
        let cwd = tree.dir.join("world").join("sub1");
        assert_eq!(
            current_path(&tree, &cwd).expect("current"),
            vec!["world".to_string(), "sub1".to_string()]
        );
        assert_eq!(current_node(&tree, &cwd).expect("node").name, "sub1");
    }

    #[test]
    fn unknown_directory_has_no_current_task() {
        let tree = sample_tree();
        assert!(current_path(&tree, &tree.dir.join("not_a_task")).is_none());
    }

    #[test]
    fn directory_outside_the_root_has_no_current_task() {
        let tree = sample_tree();
        assert!(current_path(&tree, Path::new("/somewhere/else")).is_none());
    }

    #[test]
    fn name_collision_resolves_to_preorder_first() {
        let tree = node_with_children(
            "root",
            vec![
                node_with_children("a", vec![node("dup")]),
                node("dup"),
            ],
        );

        // cwd sits in the top-level "dup", but name matching finds the
        // nested one first; an accepted ambiguity of name-based resolution.
        let cwd = tree.dir.join("dup");
        let found = current_node(&tree, &cwd).expect("node");
        assert!(found.dir.ends_with("a/dup"));
    }
}
