// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use globset::GlobSet;
use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher as _};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::config::model::Config;
use crate::errors::{AssetpipeError, Result};
use crate::exec::shell::{fill_template, spawn_fire_and_forget};
use crate::sched::Scheduler;
use crate::task::TaskName;
use crate::watch::patterns::{build_globset, CompiledBinding};

/// Live-reload sink: paths matching `set` are pushed to the reload command.
struct ReloadSink {
    set: GlobSet,
    command: Option<String>,
}

/// Handle used to stop a running watcher from another task.
///
/// Stopping is cooperative: the in-flight triggered run completes, no new
/// triggers are scheduled after it.
#[derive(Clone)]
pub struct StopHandle {
    inner: Arc<Notify>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.inner.notify_one();
    }
}

/// Binds file patterns to the tasks they trigger and drives the
/// filesystem watch loop.
pub struct Watcher {
    root: PathBuf,
    default_settle: Duration,
    bindings: Vec<CompiledBinding>,
    reload: Option<ReloadSink>,
    stop: Arc<Notify>,
}

impl Watcher {
    pub fn new(root: impl Into<PathBuf>, default_settle: Duration) -> Self {
        Self {
            root: root.into(),
            default_settle,
            bindings: Vec::new(),
            reload: None,
            stop: Arc::new(Notify::new()),
        }
    }

    /// Build a watcher for the working directory from `[watch]` and
    /// `[live_reload]` config.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let mut watcher = Self::new(".", Duration::from_millis(cfg.watch.settle_ms));

        for binding in &cfg.watch.bindings {
            watcher.bind(
                &binding.patterns,
                binding.tasks.clone(),
                binding.settle_ms.map(Duration::from_millis),
            )?;
        }

        if cfg.live_reload.enabled && !cfg.live_reload.patterns.is_empty() {
            watcher.reload = Some(ReloadSink {
                set: build_globset(&cfg.live_reload.patterns)?,
                command: cfg.tools.reload.clone(),
            });
        }

        Ok(watcher)
    }

    /// Add a binding: glob patterns, bound task names, optional settle
    /// override.
    pub fn bind(
        &mut self,
        patterns: &[String],
        tasks: Vec<TaskName>,
        settle: Option<Duration>,
    ) -> Result<()> {
        let settle = settle.unwrap_or(self.default_settle);
        self.bindings
            .push(CompiledBinding::new(patterns, tasks, settle)?);
        Ok(())
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            inner: Arc::clone(&self.stop),
        }
    }

    /// Watch the project root and dispatch bound tasks on change.
    ///
    /// Does not resolve until the stop handle fires (or the event channel
    /// closes). Bound tasks are validated against the scheduler before
    /// listening starts, so a bad binding fails here rather than on the
    /// first change event.
    pub async fn start(&mut self, scheduler: &Scheduler<'_>) -> Result<()> {
        for binding in &self.bindings {
            for task in binding.tasks() {
                scheduler.resolve_prerequisites(task)?;
            }
        }

        let root = self
            .root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone());

        // Channel from the blocking notify callback into the async world.
        let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

        let mut fs_watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        eprintln!("assetpipe: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("assetpipe: file watch error: {err}");
                }
            },
            NotifyConfig::default(),
        )
        .map_err(|e| AssetpipeError::Other(e.into()))?;

        fs_watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| AssetpipeError::Other(e.into()))?;

        info!("file watcher started on {:?}", root);

        let stop = Arc::clone(&self.stop);
        loop {
            tokio::select! {
                _ = stop.notified() => {
                    info!("watcher stop requested; no new triggers will be scheduled");
                    break;
                }
                maybe_event = event_rx.recv() => {
                    let Some(event) = maybe_event else {
                        debug!("watch event channel closed");
                        break;
                    };
                    self.handle_event(&root, &event, scheduler).await;
                }
            }
        }

        Ok(())
    }

    async fn handle_event(&mut self, root: &Path, event: &Event, scheduler: &Scheduler<'_>) {
        for path in &event.paths {
            let Some(rel) = relative_str(root, path) else {
                warn!("could not relativize path {:?} against root {:?}", path, root);
                continue;
            };

            if let Some(reload) = &self.reload {
                if reload.set.is_match(&rel) {
                    debug!(path = %rel, "pushing change to live-reload sink");
                    if let Some(template) = &reload.command {
                        spawn_fire_and_forget(&fill_template(template, &[("path", &rel)]));
                    }
                }
            }

            let now = Instant::now();
            let mut to_run: Vec<TaskName> = Vec::new();
            for binding in self.bindings.iter_mut() {
                if binding.matches(&rel) && binding.accept(now) {
                    for task in binding.tasks() {
                        if !to_run.contains(task) {
                            to_run.push(task.clone());
                        }
                    }
                }
            }

            for task in to_run {
                debug!(task = %task, path = %rel, "watch match -> triggering task");
                if let Err(err) = scheduler.run_with_prerequisites(&task).await {
                    // Individual task failures were already reported; the
                    // watch loop keeps running.
                    warn!(task = %task, error = %err, "triggered run failed");
                }
            }
        }
    }
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be
/// relativized.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}
