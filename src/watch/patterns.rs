// src/watch/patterns.rs

use std::fmt;
use std::time::{Duration, Instant};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{AssetpipeError, Result};
use crate::task::TaskName;
use crate::watch::debounce::Debouncer;

/// Compiled form of one watch binding: glob matchers, the bound tasks, and
/// a per-binding debouncer.
///
/// The patterns are evaluated against paths relative to the project root
/// (e.g. `"resources/scss/site.scss"`).
#[derive(Clone)]
pub struct CompiledBinding {
    tasks: Vec<TaskName>,
    set: GlobSet,
    debouncer: Debouncer,
}

impl fmt::Debug for CompiledBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledBinding")
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl CompiledBinding {
    pub fn new(patterns: &[String], tasks: Vec<TaskName>, settle: Duration) -> Result<Self> {
        Ok(Self {
            tasks,
            set: build_globset(patterns)?,
            debouncer: Debouncer::new(settle),
        })
    }

    /// Task names triggered when a matching path changes.
    pub fn tasks(&self) -> &[TaskName] {
        &self.tasks
    }

    /// Whether this binding is interested in the given relative path.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path)
    }

    /// Whether an event at `now` passes the settle window.
    pub fn accept(&mut self, now: Instant) -> bool {
        self.debouncer.accept(now)
    }
}

/// Build a `GlobSet` from simple string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .map_err(|e| AssetpipeError::ConfigParse(format!("invalid glob pattern '{pat}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| AssetpipeError::ConfigParse(format!("building glob set: {e}")))
}
