// src/task/registry.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{AssetpipeError, Result};
use crate::task::definition::{TaskAction, TaskDefinition, TaskName};

/// One registry entry: either a task definition or a named concurrent group.
#[derive(Debug, Clone)]
enum Entry {
    Task(TaskDefinition),
    Group(Vec<TaskName>),
}

/// Mapping from task/group name to definition.
///
/// Tasks and groups share one namespace. Registration is fail-fast: a second
/// registration of an existing name is a `DuplicateTask` error and the first
/// registration stays active. No action is invoked at registration time.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    entries: BTreeMap<TaskName, Entry>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task with prerequisites and an action.
    pub fn register<A>(
        &mut self,
        name: impl Into<TaskName>,
        prereqs: &[&str],
        action: A,
    ) -> Result<()>
    where
        A: TaskAction + 'static,
    {
        let name = name.into();
        let prereqs = prereqs.iter().map(|s| s.to_string()).collect();
        self.insert(
            name.clone(),
            Entry::Task(TaskDefinition::new(name, prereqs, Some(Arc::new(action)))),
        )
    }

    /// Register an action-less aggregation task: scheduling it runs its
    /// prerequisites and nothing else.
    pub fn register_aggregate(
        &mut self,
        name: impl Into<TaskName>,
        prereqs: &[&str],
    ) -> Result<()> {
        let name = name.into();
        let prereqs = prereqs.iter().map(|s| s.to_string()).collect();
        self.insert(
            name.clone(),
            Entry::Task(TaskDefinition::new(name, prereqs, None)),
        )
    }

    /// Register a named group of tasks meant to run concurrently as one
    /// scheduling unit.
    pub fn register_group(&mut self, name: impl Into<TaskName>, members: &[&str]) -> Result<()> {
        let name = name.into();
        let members = members.iter().map(|s| s.to_string()).collect();
        self.insert(name, Entry::Group(members))
    }

    fn insert(&mut self, name: TaskName, entry: Entry) -> Result<()> {
        if self.entries.contains_key(&name) {
            return Err(AssetpipeError::DuplicateTask(name));
        }
        debug!(name = %name, "registered");
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Look up a task definition by name.
    pub fn get(&self, name: &str) -> Result<&TaskDefinition> {
        match self.entries.get(name) {
            Some(Entry::Task(def)) => Ok(def),
            _ => Err(AssetpipeError::TaskNotFound(name.to_string())),
        }
    }

    /// Members of a named group, or `None` if `name` is not a group.
    pub fn group(&self, name: &str) -> Option<&[TaskName]> {
        match self.entries.get(name) {
            Some(Entry::Group(members)) => Some(members.as_slice()),
            _ => None,
        }
    }

    /// Whether any entry (task or group) exists under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All registered task names (groups excluded), in sorted order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(name, entry)| match entry {
            Entry::Task(_) => Some(name.as_str()),
            Entry::Group(_) => None,
        })
    }
}
