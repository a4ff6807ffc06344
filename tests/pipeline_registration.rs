mod common;

use std::error::Error;
use std::sync::Arc;

use assetpipe::config::Config;
use assetpipe::pipeline::{build_registry, pipelines, resolve_stages};
use assetpipe::report::ErrorReporter;
use assetpipe::sched::{ScheduleRequest, Scheduler};

type TestResult = Result<(), Box<dyn Error>>;

fn empty_config() -> Arc<Config> {
    let cfg: Config = toml::from_str("").expect("empty config must deserialize");
    Arc::new(cfg)
}

#[test]
fn registry_contains_the_fixed_task_set() -> TestResult {
    common::init_tracing();

    let registry = build_registry(&empty_config())?;

    for task in [
        "clean",
        "styles",
        "lint",
        "scripts-dev",
        "scripts-prod",
        "inject-dev",
        "inject-prod",
        "images",
        "styleguide",
        "styleguide-assets-dev",
        "styleguide-assets-prod",
        "cache-clear",
        "migrate",
        "fix-perms",
        "maintenance",
        "restart-server",
    ] {
        assert!(registry.get(task).is_ok(), "missing task '{task}'");
    }

    assert!(registry.group("assets-dev").is_some());
    assert!(registry.group("assets-prod").is_some());

    Ok(())
}

#[test]
fn script_tasks_depend_on_lint_and_injection_on_scripts() -> TestResult {
    let registry = build_registry(&empty_config())?;

    assert_eq!(registry.get("scripts-dev")?.prereqs, vec!["lint".to_string()]);
    assert_eq!(registry.get("scripts-prod")?.prereqs, vec!["lint".to_string()]);
    assert_eq!(
        registry.get("inject-dev")?.prereqs,
        vec!["scripts-dev".to_string()]
    );
    assert_eq!(
        registry.get("inject-prod")?.prereqs,
        vec!["scripts-prod".to_string()]
    );

    Ok(())
}

#[test]
fn build_pipeline_resolves_to_the_expected_schedule() -> TestResult {
    let registry = build_registry(&empty_config())?;
    let reporter = ErrorReporter::default();
    let scheduler = Scheduler::new(&registry, &reporter);

    let all = pipelines();
    let build = all.get("build").expect("build pipeline exists");
    assert!(!build.watch);

    let request = resolve_stages(&scheduler, &build.stages)?;
    let expected = ScheduleRequest::new()
        .then("clean")
        .then_group(["cache-clear", "images", "lint", "styles"])
        .then("scripts-prod")
        .then("inject-prod")
        .then("styleguide")
        .then("styleguide-assets-prod");
    assert_eq!(request, expected);

    Ok(())
}

#[test]
fn default_pipeline_uses_dev_variants_and_watches() -> TestResult {
    let registry = build_registry(&empty_config())?;
    let reporter = ErrorReporter::default();
    let scheduler = Scheduler::new(&registry, &reporter);

    let all = pipelines();
    let default = all.get("default").expect("default pipeline exists");
    assert!(default.watch);

    let request = resolve_stages(&scheduler, &default.stages)?;
    let expected = ScheduleRequest::new()
        .then("clean")
        .then_group(["cache-clear", "images", "lint", "styles"])
        .then("scripts-dev")
        .then("inject-dev")
        .then("styleguide")
        .then("styleguide-assets-dev");
    assert_eq!(request, expected);

    Ok(())
}

#[test]
fn deploy_pipeline_forces_notifications_off() {
    let all = pipelines();

    let deploy = all.get("deploy").expect("deploy pipeline exists");
    assert_eq!(deploy.notifications, Some(false));
    assert!(!deploy.watch);

    let build = all.get("build").expect("build pipeline exists");
    assert_eq!(build.notifications, None);

    let watch = all.get("watch").expect("watch pipeline exists");
    assert!(watch.watch);
    assert!(watch.stages.is_empty());
}

#[test]
fn single_task_resolution_pulls_its_chain() -> TestResult {
    let registry = build_registry(&empty_config())?;
    let reporter = ErrorReporter::default();
    let scheduler = Scheduler::new(&registry, &reporter);

    let request = scheduler.resolve_prerequisites("inject-prod")?;
    let expected = ScheduleRequest::new()
        .then("lint")
        .then("scripts-prod")
        .then("inject-prod");
    assert_eq!(request, expected);

    Ok(())
}
