mod common;

use std::error::Error;

use assetpipe::errors::AssetpipeError;
use assetpipe::task::TaskRegistry;

use common::{events, new_log, recording};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn duplicate_registration_fails_and_keeps_first() -> TestResult {
    let log = new_log();
    let mut registry = TaskRegistry::new();

    registry.register("build", &["clean"], recording(&log, "first"))?;

    let err = registry
        .register("build", &[], recording(&log, "second"))
        .expect_err("second registration must fail");

    match err {
        AssetpipeError::DuplicateTask(name) => assert_eq!(name, "build"),
        other => panic!("expected DuplicateTask, got {other:?}"),
    }

    // First registration remains active, prerequisites intact.
    let def = registry.get("build")?;
    assert_eq!(def.prereqs, vec!["clean".to_string()]);

    Ok(())
}

#[test]
fn group_names_share_the_task_namespace() -> TestResult {
    let log = new_log();
    let mut registry = TaskRegistry::new();

    registry.register("styles", &[], recording(&log, "styles"))?;
    let err = registry
        .register_group("styles", &["a", "b"])
        .expect_err("group must not shadow a task");
    assert!(matches!(err, AssetpipeError::DuplicateTask(_)));

    Ok(())
}

#[test]
fn unknown_lookup_is_task_not_found() {
    let registry = TaskRegistry::new();

    let err = registry.get("missing").expect_err("lookup must fail");
    match err {
        AssetpipeError::TaskNotFound(name) => assert_eq!(name, "missing"),
        other => panic!("expected TaskNotFound, got {other:?}"),
    }
}

#[test]
fn group_lookup_returns_members() -> TestResult {
    let mut registry = TaskRegistry::new();
    registry.register_group("assets", &["styles", "images"])?;

    assert_eq!(
        registry.group("assets"),
        Some(["styles".to_string(), "images".to_string()].as_slice())
    );
    assert!(registry.group("styles").is_none());
    assert!(registry.contains("assets"));

    // A group is not a task definition.
    assert!(matches!(
        registry.get("assets"),
        Err(AssetpipeError::TaskNotFound(_))
    ));

    Ok(())
}

#[test]
fn registration_does_not_invoke_actions() -> TestResult {
    let log = new_log();
    let mut registry = TaskRegistry::new();
    registry.register("styles", &[], recording(&log, "styles"))?;
    registry.register_aggregate("build", &["styles"])?;

    assert!(events(&log).is_empty());
    assert!(registry.get("build")?.action.is_none());
    assert!(registry.get("styles")?.action.is_some());

    Ok(())
}

#[test]
fn task_names_lists_tasks_not_groups() -> TestResult {
    let log = new_log();
    let mut registry = TaskRegistry::new();
    registry.register("styles", &[], recording(&log, "styles"))?;
    registry.register("images", &[], recording(&log, "images"))?;
    registry.register_group("assets", &["styles", "images"])?;

    let names: Vec<&str> = registry.task_names().collect();
    assert_eq!(names, vec!["images", "styles"]);

    Ok(())
}
