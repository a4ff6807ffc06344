// src/task/definition.rs

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Public type alias for task names throughout the crate.
pub type TaskName = String;

/// Boxed future returned by a task action.
pub type ActionFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A unit of build work.
///
/// Actions have no return value beyond success/failure, may be long-running,
/// and may run arbitrary internal concurrency; the scheduler only awaits the
/// returned future. Implemented for any `Fn() -> impl Future` closure so
/// registration sites stay readable.
pub trait TaskAction: Send + Sync {
    fn invoke(&self) -> ActionFuture;
}

impl<F, Fut> TaskAction for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn invoke(&self) -> ActionFuture {
        Box::pin(self())
    }
}

/// A named task: prerequisite task (or group) names plus an optional action.
///
/// Definitions are registered once at startup and immutable thereafter. A
/// definition without an action is a pure aggregation node; scheduling it
/// runs its prerequisites and nothing else.
#[derive(Clone)]
pub struct TaskDefinition {
    pub name: TaskName,
    pub prereqs: Vec<TaskName>,
    pub action: Option<Arc<dyn TaskAction>>,
}

impl std::fmt::Debug for TaskDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDefinition")
            .field("name", &self.name)
            .field("prereqs", &self.prereqs)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl TaskDefinition {
    pub fn new(
        name: impl Into<TaskName>,
        prereqs: Vec<TaskName>,
        action: Option<Arc<dyn TaskAction>>,
    ) -> Self {
        Self {
            name: name.into(),
            prereqs,
            action,
        }
    }
}
