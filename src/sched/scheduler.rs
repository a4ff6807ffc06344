// src/sched/scheduler.rs

use std::collections::{BTreeMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, info, warn};

use crate::errors::{AssetpipeError, Result};
use crate::report::{ErrorRecord, ErrorReporter};
use crate::sched::request::{ScheduleRequest, ScheduleUnit};
use crate::task::{TaskName, TaskRegistry};

/// Executes schedule requests against the registry.
///
/// The scheduler borrows the registry and the reporter for the duration of
/// one execution and owns no long-lived state. Failure policy:
///
/// - within a group: fail-soft — one member's failure never cancels
///   siblings already in flight; the group settles fully,
/// - between units: fail-fast — units after a failed one do not start,
/// - every failure is reported as it settles, and the overall run fails
///   with `Pipeline { failed }` listing all failed tasks.
pub struct Scheduler<'a> {
    registry: &'a TaskRegistry,
    reporter: &'a ErrorReporter,
}

impl<'a> Scheduler<'a> {
    pub fn new(registry: &'a TaskRegistry, reporter: &'a ErrorReporter) -> Self {
        Self { registry, reporter }
    }

    /// Execute a request: units strictly in order, group members
    /// concurrently.
    ///
    /// Every name is validated against the registry before any action is
    /// invoked.
    pub async fn run(&self, request: &ScheduleRequest) -> Result<()> {
        for name in request.task_names() {
            self.registry.get(name)?;
        }

        for unit in request.units() {
            let failed = match unit {
                ScheduleUnit::Task(name) => self.run_single(name).await?,
                ScheduleUnit::Group(members) => self.run_group(members).await?,
            };

            if !failed.is_empty() {
                warn!(?failed, "unit failed; later units will not start");
                return Err(AssetpipeError::Pipeline { failed });
            }
        }

        Ok(())
    }

    /// Resolve `root`'s prerequisite closure into an equivalent request and
    /// execute it.
    pub async fn run_with_prerequisites(&self, root: &str) -> Result<()> {
        let request = self.resolve_prerequisites(root)?;
        debug!(root = %root, request = %request, "resolved prerequisite schedule");
        self.run(&request).await
    }

    /// Build a request covering `root` and everything it transitively
    /// depends on.
    pub fn resolve_prerequisites(&self, root: &str) -> Result<ScheduleRequest> {
        self.resolve_roots(std::slice::from_ref(&root.to_string()))
    }

    /// Build a request covering the given roots and everything they
    /// transitively depend on.
    ///
    /// A root or prerequisite naming a group expands to its members. The
    /// closure is checked for cycles with a topological sort *before*
    /// anything runs; a cycle means zero actions execute. Tasks whose
    /// prerequisites are all emitted form one concurrent unit, so every
    /// prerequisite completes before its dependents start and independent
    /// subtrees stay parallel. Each reachable task appears exactly once.
    pub fn resolve_roots(&self, roots: &[TaskName]) -> Result<ScheduleRequest> {
        // Collect the closure, expanding named groups into their members.
        let mut deps: BTreeMap<TaskName, Vec<TaskName>> = BTreeMap::new();
        let mut pending: Vec<TaskName> = Vec::new();

        for root in roots {
            if let Some(members) = self.registry.group(root) {
                pending.extend(members.iter().cloned());
            } else {
                pending.push(root.clone());
            }
        }

        while let Some(name) = pending.pop() {
            if deps.contains_key(&name) {
                continue;
            }
            let def = self.registry.get(&name)?;

            let mut direct = Vec::new();
            for prereq in &def.prereqs {
                if let Some(members) = self.registry.group(prereq) {
                    for member in members {
                        direct.push(member.clone());
                        pending.push(member.clone());
                    }
                } else {
                    direct.push(prereq.clone());
                    pending.push(prereq.clone());
                }
            }
            deps.insert(name, direct);
        }

        // Dry-run topological check. Edge direction: dep -> task.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for name in deps.keys() {
            graph.add_node(name.as_str());
        }
        for (name, direct) in &deps {
            for dep in direct {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }
        if let Err(cycle) = toposort(&graph, None) {
            return Err(AssetpipeError::CyclicDependency(
                cycle.node_id().to_string(),
            ));
        }

        // Emit level groups: every task whose prerequisites are already
        // emitted joins the current concurrent unit.
        let mut request = ScheduleRequest::new();
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut remaining: Vec<&str> = deps.keys().map(|s| s.as_str()).collect();

        while !remaining.is_empty() {
            let (level, rest): (Vec<&str>, Vec<&str>) = remaining
                .into_iter()
                .partition(|name| deps[*name].iter().all(|d| emitted.contains(d.as_str())));

            if level.is_empty() {
                // Unreachable after the toposort check.
                return Err(AssetpipeError::CyclicDependency(rest[0].to_string()));
            }

            for name in &level {
                emitted.insert(*name);
            }

            // Aggregation nodes have nothing to execute and are skipped.
            let mut actioned: Vec<TaskName> = Vec::new();
            for name in &level {
                if self.registry.get(name)?.action.is_some() {
                    actioned.push((*name).to_string());
                }
            }

            if actioned.len() == 1 {
                if let Some(single) = actioned.pop() {
                    request = request.then(single);
                }
            } else if !actioned.is_empty() {
                request = request.then_group(actioned);
            }

            remaining = rest;
        }

        Ok(request)
    }

    /// Run one task's action; returns the failed-task list for its unit.
    async fn run_single(&self, name: &str) -> Result<Vec<TaskName>> {
        let def = self.registry.get(name)?;
        let Some(action) = &def.action else {
            debug!(task = %name, "aggregation task; nothing to execute");
            return Ok(Vec::new());
        };

        info!(task = %name, "starting task");
        match action.invoke().await {
            Ok(()) => {
                info!(task = %name, "task completed");
                Ok(Vec::new())
            }
            Err(err) => {
                self.report_failure(&AssetpipeError::TaskAction {
                    task: name.to_string(),
                    message: format!("{err:#}"),
                });
                Ok(vec![name.to_string()])
            }
        }
    }

    /// Run all members of a group concurrently and wait for every one of
    /// them to settle; returns the failed members.
    async fn run_group(&self, members: &[TaskName]) -> Result<Vec<TaskName>> {
        let mut handles = Vec::with_capacity(members.len());

        for name in members {
            let def = self.registry.get(name)?;
            match &def.action {
                Some(action) => {
                    info!(task = %name, "starting task (group)");
                    handles.push((name.clone(), Some(tokio::spawn(action.invoke()))));
                }
                None => {
                    debug!(task = %name, "aggregation task in group; nothing to execute");
                    handles.push((name.clone(), None));
                }
            }
        }

        let mut failed = Vec::new();
        for (name, handle) in handles {
            let Some(handle) = handle else { continue };

            let failure = match handle.await {
                Ok(Ok(())) => {
                    info!(task = %name, "task completed");
                    None
                }
                Ok(Err(err)) => Some(AssetpipeError::TaskAction {
                    task: name.clone(),
                    message: format!("{err:#}"),
                }),
                Err(join_err) => Some(AssetpipeError::TaskAction {
                    task: name.clone(),
                    message: format!("panicked: {join_err}"),
                }),
            };

            if let Some(failure) = failure {
                self.report_failure(&failure);
                failed.push(name);
            }
        }

        Ok(failed)
    }

    /// Capture a task failure into an `ErrorRecord` and route it to the
    /// reporter. Sibling tasks keep running; the caller decides what the
    /// failure means for the rest of the request.
    fn report_failure(&self, failure: &AssetpipeError) {
        if let AssetpipeError::TaskAction { task, message } = failure {
            let record = ErrorRecord::new(
                task.clone(),
                format!("Task '{task}' failed"),
                message.clone(),
            );
            self.reporter.report_record(&record);
        }
    }
}
