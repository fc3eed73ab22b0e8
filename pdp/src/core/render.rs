//! Pre-order enumeration and tree rendering.

use crate::tree::Node;

/// Pre-order depth-first walk assigning each node the next value from
/// `counter`, so numbering is continuous across the whole tree.
///
/// Restarting with a fresh counter on an unchanged tree yields identical
/// `(number, node)` pairs.
pub fn enumerate_preorder<'a, F>(node: &'a Node, counter: &mut usize, visit: &mut F)
where
    F: FnMut(usize, &'a Node),
{
    *counter += 1;
    visit(*counter, node);
    for child in &node.children {
        enumerate_preorder(child, counter, visit);
    }
}

/// Render the tree with pre-order numbers and unicode branches:
///
/// ```text
/// 1. project
/// ├── 2. hello
/// └── 3. world
///     └── 4. sub1
/// ```
pub fn render_tree(root: &Node) -> String {
    let mut out = String::new();
    let mut counter = 1usize;
    out.push_str(&format!("{}. {}\n", counter, root.name));
    render_children(root, "", &mut counter, &mut out);
    out
}

fn render_children(node: &Node, prefix: &str, counter: &mut usize, out: &mut String) {
    let last = node.children.len().saturating_sub(1);
    for (index, child) in node.children.iter().enumerate() {
        *counter += 1;
        let (branch, pad) = if index == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(&format!("{prefix}{branch}{counter}. {}\n", child.name));
        render_children(child, &format!("{prefix}{pad}"), counter, out);
    }
}
