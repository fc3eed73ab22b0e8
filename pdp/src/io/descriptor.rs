//! YAML descriptor records persisted per node.
//!
//! Every node owns exactly one descriptor file: `pdp.yml` for the project
//! root, `task.yml` for a task. The record is read once when the descriptor
//! is opened; after that the in-memory mapping is authoritative and is
//! written back on every mutation. Callers that need to observe edits made
//! by another process must call [`Descriptor::reload`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// File name of the root descriptor.
pub const ROOT_DESCRIPTOR: &str = "pdp.yml";
/// File name of a task descriptor.
pub const TASK_DESCRIPTOR: &str = "task.yml";

const ENTRYPOINT_KEY: &str = "entrypoint";
const NAME_KEY: &str = "name";

/// Which of the two descriptor shapes a record follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Root record: `{tasks: [...]}`.
    Root,
    /// Task record: `{entrypoint: "", subtasks: [...]}`.
    Task,
}

impl DescriptorKind {
    pub fn file_name(self) -> &'static str {
        match self {
            DescriptorKind::Root => ROOT_DESCRIPTOR,
            DescriptorKind::Task => TASK_DESCRIPTOR,
        }
    }

    /// Key holding the ordered child-name list.
    pub fn child_key(self) -> &'static str {
        match self {
            DescriptorKind::Root => "tasks",
            DescriptorKind::Task => "subtasks",
        }
    }

    fn default_record(self) -> Mapping {
        let mut record = Mapping::new();
        if self == DescriptorKind::Task {
            record.insert(ENTRYPOINT_KEY.into(), Value::String(String::new()));
        }
        record.insert(self.child_key().into(), Value::Sequence(Vec::new()));
        record
    }
}

/// One on-disk record plus its authoritative in-memory copy.
#[derive(Debug, Clone)]
pub struct Descriptor {
    kind: DescriptorKind,
    path: PathBuf,
    record: Mapping,
}

impl Descriptor {
    /// Open the descriptor living in `dir`, reading the record if present.
    ///
    /// Missing, unreadable, or non-mapping files read as an empty record.
    pub fn open(kind: DescriptorKind, dir: &Path) -> Self {
        let path = dir.join(kind.file_name());
        let record = read_record(&path);
        Self { kind, path, record }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A record counts as initialized once the file exists and holds a
    /// non-empty mapping.
    pub fn initialized(&self) -> bool {
        self.path.exists() && !self.record.is_empty()
    }

    /// Create the default record if absent.
    ///
    /// An already-initialized record is left untouched so user edits (an
    /// `entrypoint`, extra keys) survive, but it must pass [`validate`]:
    /// a structurally broken file is a fatal configuration error, not
    /// something to repair.
    ///
    /// [`validate`]: Descriptor::validate
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized() {
            if !self.validate() {
                return Err(anyhow!("invalid descriptor {}", self.path.display()));
            }
            return Ok(());
        }
        self.record = self.kind.default_record();
        debug!(path = %self.path.display(), "writing default descriptor");
        self.persist()
    }

    /// Like [`initialize`](Descriptor::initialize), seeding a `name` key
    /// ahead of the defaults when creating a fresh record.
    pub fn initialize_named(&mut self, name: Option<&str>) -> Result<()> {
        if !self.initialized()
            && let Some(name) = name
        {
            let mut record = Mapping::new();
            record.insert(NAME_KEY.into(), name.into());
            for (key, value) in self.kind.default_record() {
                record.insert(key, value);
            }
            self.record = record;
            debug!(path = %self.path.display(), name, "writing named descriptor");
            return self.persist();
        }
        self.initialize()
    }

    /// Structural validation: required keys present and the child list
    /// actually a list. Element types and extra keys are not inspected, so
    /// hand-edited files with comments or additional keys pass.
    pub fn validate(&self) -> bool {
        if !self.initialized() {
            return false;
        }
        if self.kind == DescriptorKind::Task && !self.record.contains_key(ENTRYPOINT_KEY) {
            return false;
        }
        match self.record.get(self.kind.child_key()) {
            Some(value) => value.is_sequence(),
            None => false,
        }
    }

    /// Declared child names in record order. Permissive: a missing or
    /// non-list field reads as empty, non-string elements are skipped.
    pub fn child_names(&self) -> Vec<String> {
        match self.record.get(self.kind.child_key()) {
            Some(Value::Sequence(seq)) => seq
                .iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Append `name` to the child list and persist, unless already present.
    pub fn add_child(&mut self, name: &str) -> Result<()> {
        self.ensure_initialized()?;
        let key = self.kind.child_key();
        let seq = match self.record.get_mut(key) {
            Some(Value::Sequence(seq)) => seq,
            _ => {
                return Err(anyhow!(
                    "invalid descriptor {}: '{}' is not a list",
                    self.path.display(),
                    key
                ));
            }
        };
        if seq.iter().any(|value| value.as_str() == Some(name)) {
            return Ok(());
        }
        seq.push(name.into());
        self.persist()
    }

    /// Replace the whole record and persist it.
    pub fn update(&mut self, record: Mapping) -> Result<()> {
        self.ensure_initialized()?;
        self.record = record;
        self.persist()
    }

    /// Set a single top-level key and persist the record.
    pub fn update_field(&mut self, key: &str, value: Value) -> Result<()> {
        self.ensure_initialized()?;
        self.record.insert(key.into(), value);
        self.persist()
    }

    /// Re-read the record from disk, discarding the in-memory copy.
    pub fn reload(&mut self) {
        self.record = read_record(&self.path);
    }

    /// The run command, if any. An empty string means "nothing to run".
    pub fn entrypoint(&self) -> Option<&str> {
        self.record
            .get(ENTRYPOINT_KEY)
            .and_then(Value::as_str)
            .filter(|command| !command.is_empty())
    }

    /// The display name recorded by `init --name`, if any.
    pub fn name(&self) -> Option<&str> {
        self.record.get(NAME_KEY).and_then(Value::as_str)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if !self.initialized() {
            return Err(anyhow!("descriptor not initialized: {}", self.path.display()));
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let text = serde_yaml::to_string(&self.record)
            .with_context(|| format!("serialize descriptor {}", self.path.display()))?;
        fs::write(&self.path, text)
            .with_context(|| format!("write descriptor {}", self.path.display()))
    }
}

fn read_record(path: &Path) -> Mapping {
    let Ok(contents) = fs::read_to_string(path) else {
        return Mapping::new();
    };
    match serde_yaml::from_str::<Value>(&contents) {
        Ok(Value::Mapping(record)) => record,
        _ => Mapping::new(),
    }
}
