// src/sched/request.rs

use std::fmt;

use crate::task::TaskName;

/// One scheduling unit: a single task, or a group of tasks that execute
/// concurrently and settle together before the pipeline advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleUnit {
    Task(TaskName),
    Group(Vec<TaskName>),
}

/// An ordered sequence of scheduling units; one top-level pipeline.
///
/// Units execute strictly in declaration order. Within a group no ordering
/// is guaranteed between members, only joint completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleRequest {
    units: Vec<ScheduleUnit>,
}

impl ScheduleRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single-task unit.
    pub fn then(mut self, task: impl Into<TaskName>) -> Self {
        self.units.push(ScheduleUnit::Task(task.into()));
        self
    }

    /// Append a concurrent group unit.
    pub fn then_group<I, T>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskName>,
    {
        let members: Vec<TaskName> = tasks.into_iter().map(Into::into).collect();
        self.units.push(ScheduleUnit::Group(members));
        self
    }

    /// Append an already-built unit.
    pub fn then_unit(mut self, unit: ScheduleUnit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn units(&self) -> &[ScheduleUnit] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Every task name mentioned by this request, in unit order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.units.iter().flat_map(|unit| match unit {
            ScheduleUnit::Task(name) => std::slice::from_ref(name).iter(),
            ScheduleUnit::Group(members) => members.iter(),
        })
        .map(|s| s.as_str())
    }
}

impl fmt::Display for ScheduleRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, unit) in self.units.iter().enumerate() {
            if idx > 0 {
                write!(f, " -> ")?;
            }
            match unit {
                ScheduleUnit::Task(name) => write!(f, "{name}")?,
                ScheduleUnit::Group(members) => {
                    write!(f, "{{{}}}", members.join(", "))?;
                }
            }
        }
        Ok(())
    }
}
