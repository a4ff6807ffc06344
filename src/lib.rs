// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod sched;
pub mod task;
pub mod watch;

use std::sync::Arc;

use tracing::info;

use crate::cli::CliArgs;
use crate::errors::Result;
use crate::pipeline::Pipeline;
use crate::report::{ErrorReporter, ReporterOptions};
use crate::sched::{ScheduleRequest, Scheduler};
use crate::watch::Watcher;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (placeholders substituted once, result shared
///   read-only)
/// - task registration
/// - scheduler execution of the selected pipeline or root task
/// - (optional) file watcher + Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = Arc::new(config::loader::load(&args.config, &args.vars)?);

    let registry = pipeline::build_registry(&cfg)?;
    let pipelines = pipeline::pipelines();
    let selected: Option<&Pipeline> = pipelines.get(args.task.as_str());

    // Notification behaviour is fixed here, before anything runs; the
    // `deploy` pipeline and the CLI flag are both startup-time overrides.
    let desktop = selected
        .and_then(|p| p.notifications)
        .unwrap_or(cfg.notifications.desktop)
        && !args.no_notify;

    let reporter = ErrorReporter::new(ReporterOptions {
        desktop_notifications: desktop,
        notify_command: cfg.tools.notify.clone(),
    });
    let scheduler = Scheduler::new(&registry, &reporter);

    // Either a named pipeline, or any registered task/group run with its
    // prerequisite closure. Resolution includes the dry-run cycle check, so
    // nothing below executes against a broken graph.
    let (request, watch_after) = match selected {
        Some(p) => (pipeline::resolve_stages(&scheduler, &p.stages)?, p.watch),
        None => (scheduler.resolve_prerequisites(&args.task)?, false),
    };

    if args.dry_run {
        print_dry_run(&cfg, &args.task, &request, watch_after);
        return Ok(());
    }

    if !request.is_empty() {
        info!(task = %args.task, schedule = %request, "running schedule");
        scheduler.run(&request).await?;
    }

    if watch_after {
        let mut watcher = Watcher::from_config(&cfg)?;

        // Ctrl-C -> cooperative stop: in-flight triggers finish, no new
        // ones are scheduled.
        let stop = watcher.stop_handle();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            stop.stop();
        });

        watcher.start(&scheduler).await?;
    }

    Ok(())
}

/// Simple dry-run output: the resolved schedule, unit by unit.
fn print_dry_run(
    cfg: &config::Config,
    task: &str,
    request: &ScheduleRequest,
    watch_after: bool,
) {
    println!("assetpipe dry-run for '{task}'");

    if request.is_empty() {
        println!("  (no build units)");
    }
    for (idx, unit) in request.units().iter().enumerate() {
        match unit {
            sched::ScheduleUnit::Task(name) => println!("  {}. {name}", idx + 1),
            sched::ScheduleUnit::Group(members) => {
                println!("  {}. {{{}}} (concurrent)", idx + 1, members.join(", "));
            }
        }
    }

    if watch_after {
        println!(
            "  then: watch mode ({} bindings, settle {}ms)",
            cfg.watch.bindings.len(),
            cfg.watch.settle_ms
        );
    }
}
