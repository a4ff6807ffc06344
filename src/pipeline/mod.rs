// src/pipeline/mod.rs

//! The fixed task set and the named top-level pipelines.
//!
//! [`build_registry`] registers every built-in task and group against a
//! resolved config; [`pipelines`] describes the CLI-facing pipelines as
//! ordered stages that the scheduler expands into full schedule requests.

pub mod steps;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::model::Config;
use crate::errors::Result;
use crate::sched::{ScheduleRequest, ScheduleUnit, Scheduler};
use crate::task::TaskRegistry;

/// A named top-level pipeline.
///
/// `stages` execute strictly in order; each stage is expanded through the
/// scheduler so its prerequisites run first. `notifications` overrides the
/// config's desktop-notification toggle when set (the `deploy` pipeline
/// forces it off).
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub stages: Vec<ScheduleUnit>,
    pub watch: bool,
    pub notifications: Option<bool>,
}

/// Register the built-in tasks and groups.
///
/// Actions capture the shared config; nothing runs at registration time.
pub fn build_registry(cfg: &Arc<Config>) -> Result<TaskRegistry> {
    let mut registry = TaskRegistry::new();

    registry.register("clean", &[], steps::clean(cfg))?;
    registry.register("styles", &[], steps::styles(cfg))?;
    registry.register("lint", &[], steps::lint(cfg))?;
    registry.register("scripts-dev", &["lint"], steps::scripts_dev(cfg))?;
    registry.register("scripts-prod", &["lint"], steps::scripts_prod(cfg))?;
    registry.register("inject-dev", &["scripts-dev"], steps::inject(cfg, "inject-dev"))?;
    registry.register(
        "inject-prod",
        &["scripts-prod"],
        steps::inject(cfg, "inject-prod"),
    )?;
    registry.register("images", &[], steps::images(cfg))?;
    registry.register("styleguide", &[], steps::styleguide(cfg))?;
    registry.register(
        "styleguide-assets-dev",
        &[],
        steps::styleguide_assets(cfg, "styleguide-assets-dev"),
    )?;
    registry.register(
        "styleguide-assets-prod",
        &[],
        steps::styleguide_assets(cfg, "styleguide-assets-prod"),
    )?;

    registry.register(
        "cache-clear",
        &[],
        steps::shell_task("cache-clear", cfg.shell.cache_clear.clone()),
    )?;
    registry.register(
        "migrate",
        &[],
        steps::shell_task("migrate", cfg.shell.migrate.clone()),
    )?;
    registry.register(
        "fix-perms",
        &[],
        steps::shell_task("fix-perms", cfg.shell.fix_perms.clone()),
    )?;
    registry.register(
        "maintenance",
        &[],
        steps::shell_task("maintenance", cfg.shell.maintenance.clone()),
    )?;
    registry.register(
        "restart-server",
        &[],
        steps::shell_task("restart-server", cfg.shell.restart_server.clone()),
    )?;

    registry.register_group(
        "assets-dev",
        &["cache-clear", "styles", "inject-dev", "images"],
    )?;
    registry.register_group(
        "assets-prod",
        &["cache-clear", "styles", "inject-prod", "images"],
    )?;

    Ok(registry)
}

/// The named pipelines selectable from the CLI.
pub fn pipelines() -> BTreeMap<&'static str, Pipeline> {
    let mut map = BTreeMap::new();

    map.insert(
        "default",
        Pipeline {
            stages: vec![
                ScheduleUnit::Task("clean".into()),
                ScheduleUnit::Task("assets-dev".into()),
                ScheduleUnit::Task("styleguide".into()),
                ScheduleUnit::Task("styleguide-assets-dev".into()),
            ],
            watch: true,
            notifications: None,
        },
    );

    map.insert(
        "build",
        Pipeline {
            stages: vec![
                ScheduleUnit::Task("clean".into()),
                ScheduleUnit::Task("assets-prod".into()),
                ScheduleUnit::Task("styleguide".into()),
                ScheduleUnit::Task("styleguide-assets-prod".into()),
            ],
            watch: false,
            notifications: None,
        },
    );

    map.insert(
        "deploy",
        Pipeline {
            stages: vec![
                ScheduleUnit::Task("clean".into()),
                ScheduleUnit::Task("assets-prod".into()),
                ScheduleUnit::Task("styleguide".into()),
                ScheduleUnit::Task("styleguide-assets-prod".into()),
            ],
            watch: false,
            notifications: Some(false),
        },
    );

    map.insert(
        "watch",
        Pipeline {
            stages: Vec::new(),
            watch: true,
            notifications: None,
        },
    );

    map
}

/// Expand a pipeline's stages into one full schedule request, with each
/// stage's prerequisite closure resolved in front of it.
pub fn resolve_stages(
    scheduler: &Scheduler<'_>,
    stages: &[ScheduleUnit],
) -> Result<ScheduleRequest> {
    let mut request = ScheduleRequest::new();

    for stage in stages {
        let sub = match stage {
            ScheduleUnit::Task(name) => scheduler.resolve_prerequisites(name)?,
            ScheduleUnit::Group(members) => scheduler.resolve_roots(members)?,
        };
        for unit in sub.units() {
            request = request.then_unit(unit.clone());
        }
    }

    Ok(request)
}
