//! Project-level operations: root discovery, loading, initialization, and
//! descriptor validation.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use super::descriptor::{Descriptor, DescriptorKind, ROOT_DESCRIPTOR};
use super::scaffold::scaffold;
use crate::tree::Node;

/// Walk up from `start` looking for the directory holding `pdp.yml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(ROOT_DESCRIPTOR).is_file())
        .map(Path::to_path_buf)
}

/// Rehydrate (and materialize) the whole tree rooted at `root_dir`.
pub fn load_project(root_dir: &Path) -> Result<Node> {
    debug!(root = %root_dir.display(), "loading project");
    scaffold(Node::root(root_dir.to_path_buf()))
}

/// Create `pdp.yml` in `dir` if absent. An existing valid descriptor is left
/// untouched; an existing broken one is a fatal configuration error.
pub fn init_project(dir: &Path, name: Option<&str>) -> Result<()> {
    let mut descriptor = Descriptor::open(DescriptorKind::Root, dir);
    descriptor.initialize_named(name)
}

/// Walk every reachable descriptor without materializing anything and
/// return the paths of those failing structural validation.
///
/// An uninitialized root reports the root descriptor path. Declared children
/// whose descriptor is missing report as invalid too. Child lists are read
/// permissively, so a broken descriptor still lets the walk continue past it.
pub fn validate_project(root_dir: &Path) -> Vec<PathBuf> {
    let mut invalid = Vec::new();
    let mut work = vec![(root_dir.to_path_buf(), DescriptorKind::Root)];
    let mut cursor = 0;

    while cursor < work.len() {
        let (dir, kind) = work[cursor].clone();
        cursor += 1;
        let descriptor = Descriptor::open(kind, &dir);
        if !descriptor.validate() {
            invalid.push(descriptor.path().to_path_buf());
        }
        for name in descriptor.child_names() {
            work.push((dir.join(name), DescriptorKind::Task));
        }
    }
    invalid
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::io::descriptor::TASK_DESCRIPTOR;
    use crate::io::scaffold::create_child;
    use crate::test_support::TestProject;

    #[test]
    fn init_is_idempotent_on_existing_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(ROOT_DESCRIPTOR), "tasks:\n  - hello\n").expect("write");

        init_project(temp.path(), Some("renamed")).expect("init");
        let contents = fs::read_to_string(temp.path().join(ROOT_DESCRIPTOR)).expect("read");
        // user edits survive, including the absence of a name
        assert_eq!(contents, "tasks:\n  - hello\n");
    }

    #[test]
    fn init_rejects_broken_root_descriptor() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(ROOT_DESCRIPTOR), "hello: 123\n").expect("write");

        let err = init_project(temp.path(), None).expect_err("should fail");
        assert!(err.to_string().contains("invalid descriptor"));
    }

    #[test]
    fn find_project_root_walks_up_from_nested_directories() {
        let project = TestProject::new().expect("project");
        let mut root = project.load().expect("load");
        create_child(&mut root, "hello").expect("create");

        let nested = project.root_dir().join("hello").join("src");
        assert_eq!(
            find_project_root(&nested).expect("root"),
            project.root_dir().to_path_buf()
        );
        assert!(find_project_root(Path::new("/")).is_none());
    }

    #[test]
    fn validate_reports_nothing_for_a_healthy_tree() {
        let project = TestProject::new().expect("project");
        let mut root = project.load().expect("load");
        create_child(&mut root, "hello").expect("create");

        assert!(validate_project(project.root_dir()).is_empty());
    }

    #[test]
    fn validate_reports_uninitialized_project() {
        let temp = tempfile::tempdir().expect("tempdir");
        let invalid = validate_project(temp.path());
        assert_eq!(invalid, vec![temp.path().join(ROOT_DESCRIPTOR)]);
    }

    #[test]
    fn validate_flags_broken_task_descriptor_without_scaffolding() {
        let project = TestProject::new().expect("project");
        {
            let mut root = project.load().expect("load");
            create_child(&mut root, "hello").expect("create");
        }
        let task_path = project.root_dir().join("hello").join(TASK_DESCRIPTOR);
        fs::write(&task_path, "subtasks: []\n").expect("drop entrypoint");

        let invalid = validate_project(project.root_dir());
        assert_eq!(invalid, vec![task_path.clone()]);

        // restoring the entrypoint makes it valid again
        fs::write(&task_path, "entrypoint: ''\nsubtasks: []\n").expect("restore");
        assert!(validate_project(project.root_dir()).is_empty());
    }

    #[test]
    fn validate_flags_missing_descriptor_of_a_declared_child() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(ROOT_DESCRIPTOR), "tasks:\n  - ghost\n").expect("write");

        let invalid = validate_project(temp.path());
        assert_eq!(invalid, vec![temp.path().join("ghost").join(TASK_DESCRIPTOR)]);
    }
}
