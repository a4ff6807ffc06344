mod common;

use std::error::Error;

use assetpipe::report::ErrorReporter;
use assetpipe::sched::{ScheduleRequest, ScheduleUnit, Scheduler};
use assetpipe::task::TaskRegistry;

use common::{count_of, events, index_of, new_log, recording};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn prerequisites_run_exactly_once_and_before_dependent() -> TestResult {
    common::init_tracing();

    let log = new_log();
    let mut registry = TaskRegistry::new();
    registry.register("clean", &[], recording(&log, "clean"))?;
    registry.register("styles", &[], recording(&log, "styles"))?;
    registry.register_aggregate("build", &["clean", "styles"])?;
    registry.register("package", &["build"], recording(&log, "package"))?;

    let reporter = ErrorReporter::default();
    let scheduler = Scheduler::new(&registry, &reporter);

    scheduler.run_with_prerequisites("package").await?;

    let ev = events(&log);

    // Three distinct actions, each exactly once.
    assert_eq!(count_of(&ev, "start:clean"), 1);
    assert_eq!(count_of(&ev, "start:styles"), 1);
    assert_eq!(count_of(&ev, "start:package"), 1);
    assert_eq!(ev.len(), 6);

    // Both prerequisites complete before package starts.
    let package_start = index_of(&ev, "start:package");
    assert!(index_of(&ev, "end:clean") < package_start);
    assert!(index_of(&ev, "end:styles") < package_start);

    // clean and styles overlap: each starts before the other ends.
    assert!(index_of(&ev, "start:clean") < index_of(&ev, "end:styles"));
    assert!(index_of(&ev, "start:styles") < index_of(&ev, "end:clean"));

    Ok(())
}

#[tokio::test]
async fn resolution_emits_level_groups() -> TestResult {
    let log = new_log();
    let mut registry = TaskRegistry::new();
    registry.register("clean", &[], recording(&log, "clean"))?;
    registry.register("styles", &[], recording(&log, "styles"))?;
    registry.register_aggregate("build", &["clean", "styles"])?;
    registry.register("package", &["build"], recording(&log, "package"))?;

    let reporter = ErrorReporter::default();
    let scheduler = Scheduler::new(&registry, &reporter);

    let request = scheduler.resolve_prerequisites("package")?;

    let expected = ScheduleRequest::new()
        .then_group(["clean", "styles"])
        .then("package");
    assert_eq!(request, expected);

    Ok(())
}

#[tokio::test]
async fn chain_runs_in_dependency_order() -> TestResult {
    let log = new_log();
    let mut registry = TaskRegistry::new();
    registry.register("a", &[], recording(&log, "a"))?;
    registry.register("b", &["a"], recording(&log, "b"))?;
    registry.register("c", &["b"], recording(&log, "c"))?;

    let reporter = ErrorReporter::default();
    let scheduler = Scheduler::new(&registry, &reporter);

    scheduler.run_with_prerequisites("c").await?;

    let ev = events(&log);
    assert_eq!(
        ev,
        vec!["start:a", "end:a", "start:b", "end:b", "start:c", "end:c"]
    );

    Ok(())
}

#[tokio::test]
async fn group_name_prerequisite_expands_to_members() -> TestResult {
    let log = new_log();
    let mut registry = TaskRegistry::new();
    registry.register("styles", &[], recording(&log, "styles"))?;
    registry.register("images", &[], recording(&log, "images"))?;
    registry.register_group("assets", &["styles", "images"])?;
    registry.register("publish", &["assets"], recording(&log, "publish"))?;

    let reporter = ErrorReporter::default();
    let scheduler = Scheduler::new(&registry, &reporter);

    let request = scheduler.resolve_prerequisites("publish")?;
    let expected = ScheduleRequest::new()
        .then_group(["images", "styles"])
        .then("publish");
    assert_eq!(request, expected);

    scheduler.run(&request).await?;

    let ev = events(&log);
    let publish_start = index_of(&ev, "start:publish");
    assert!(index_of(&ev, "end:styles") < publish_start);
    assert!(index_of(&ev, "end:images") < publish_start);

    Ok(())
}

#[tokio::test]
async fn shared_prerequisite_runs_once() -> TestResult {
    let log = new_log();
    let mut registry = TaskRegistry::new();
    registry.register("lint", &[], recording(&log, "lint"))?;
    registry.register("scripts", &["lint"], recording(&log, "scripts"))?;
    registry.register("bundles", &["lint"], recording(&log, "bundles"))?;
    registry.register("site", &["scripts", "bundles"], recording(&log, "site"))?;

    let reporter = ErrorReporter::default();
    let scheduler = Scheduler::new(&registry, &reporter);

    scheduler.run_with_prerequisites("site").await?;

    let ev = events(&log);
    assert_eq!(count_of(&ev, "start:lint"), 1);
    assert_eq!(count_of(&ev, "start:scripts"), 1);
    assert_eq!(count_of(&ev, "start:bundles"), 1);
    assert!(index_of(&ev, "end:lint") < index_of(&ev, "start:scripts"));
    assert!(index_of(&ev, "end:lint") < index_of(&ev, "start:bundles"));
    assert!(index_of(&ev, "end:scripts") < index_of(&ev, "start:site"));
    assert!(index_of(&ev, "end:bundles") < index_of(&ev, "start:site"));

    Ok(())
}

#[tokio::test]
async fn resolving_a_group_root_runs_members_concurrently() -> TestResult {
    let log = new_log();
    let mut registry = TaskRegistry::new();
    registry.register("styles", &[], recording(&log, "styles"))?;
    registry.register("images", &[], recording(&log, "images"))?;
    registry.register_group("assets", &["styles", "images"])?;

    let reporter = ErrorReporter::default();
    let scheduler = Scheduler::new(&registry, &reporter);

    let request = scheduler.resolve_prerequisites("assets")?;
    assert_eq!(
        request.units(),
        &[ScheduleUnit::Group(vec![
            "images".to_string(),
            "styles".to_string()
        ])]
    );

    Ok(())
}
