//! Depth-first task execution.

use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::tree::Node;

/// Aggregate outcome of running a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

impl RunStatus {
    pub fn succeeded(self) -> bool {
        self == RunStatus::Success
    }
}

/// Run `node` depth-first: every child in declared order first, then the
/// node's own entrypoint (if any) as a shell command with the node's
/// directory as working directory.
///
/// There is no short-circuit: a failing child does not stop its siblings or
/// the node's own command, but any single failure anywhere in the subtree
/// makes the aggregate a [`RunStatus::Failure`]. The child process inherits
/// stdout/stderr; the caller blocks until it exits.
pub fn run_node(node: &Node) -> Result<RunStatus> {
    let mut status = RunStatus::Success;
    for child in &node.children {
        if !run_node(child)?.succeeded() {
            status = RunStatus::Failure;
        }
    }

    let Some(entrypoint) = node.entrypoint() else {
        debug!(task = %node.name, "no entrypoint, nothing to run");
        return Ok(status);
    };

    debug!(task = %node.name, %entrypoint, "running entrypoint");
    let exit = Command::new("sh")
        .arg("-c")
        .arg(entrypoint)
        .current_dir(&node.dir)
        .status()
        .with_context(|| format!("spawn entrypoint for task '{}'", node.name))?;
    if !exit.success() {
        warn!(task = %node.name, code = ?exit.code(), "entrypoint failed");
        status = RunStatus::Failure;
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::scaffold::create_child;
    use crate::test_support::{TestProject, set_entrypoint};

    #[test]
    fn runs_children_before_own_entrypoint() {
        let project = TestProject::new().expect("project");
        let mut root = project.load().expect("load");
        create_child(&mut root, "hello").expect("create");
        // child writes a marker, parent command requires it
        set_entrypoint(&root.dir.join("hello"), "touch output/ran.txt").expect("set");
        let root = project.load().expect("reload");

        let hello = root.resolve_child("hello").expect("hello");
        let status = run_node(&root).expect("run");
        assert!(status.succeeded());
        assert!(hello.dir.join("output").join("ran.txt").is_file());
    }

    #[test]
    fn failure_does_not_short_circuit_siblings() {
        let project = TestProject::new().expect("project");
        {
            let mut root = project.load().expect("load");
            create_child(&mut root, "a").expect("create");
            create_child(&mut root, "b").expect("create");
        }
        set_entrypoint(&project.root_dir().join("a"), "exit 1").expect("set");
        set_entrypoint(&project.root_dir().join("b"), "touch output/b_ran.txt").expect("set");

        let root = project.load().expect("reload");
        let status = run_node(&root).expect("run");
        assert!(!status.succeeded());
        // b still ran after a failed
        assert!(project.root_dir().join("b").join("output").join("b_ran.txt").is_file());
    }

    #[test]
    fn missing_entrypoint_is_not_an_error() {
        let project = TestProject::new().expect("project");
        let mut root = project.load().expect("load");
        create_child(&mut root, "quiet").expect("create");

        let status = run_node(&root).expect("run");
        assert!(status.succeeded());
    }

    #[test]
    fn entrypoint_runs_in_the_task_directory() {
        let project = TestProject::new().expect("project");
        {
            let mut root = project.load().expect("load");
            create_child(&mut root, "where").expect("create");
        }
        set_entrypoint(&project.root_dir().join("where"), "pwd > output/cwd.txt").expect("set");

        let root = project.load().expect("reload");
        assert!(run_node(&root).expect("run").succeeded());
        let recorded = std::fs::read_to_string(
            project.root_dir().join("where").join("output").join("cwd.txt"),
        )
        .expect("read");
        let task_dir = project
            .root_dir()
            .join("where")
            .canonicalize()
            .expect("canonicalize");
        assert_eq!(recorded.trim(), task_dir.to_string_lossy());
    }
}
