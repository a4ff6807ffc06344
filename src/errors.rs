// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Startup errors (`ConfigParse`, `DuplicateTask`, `CyclicDependency`) are
//! fatal and abort before any task action runs. `TaskAction` is recovered
//! locally by the reporter; `Pipeline` is the aggregate surfaced to the
//! top-level caller once all in-flight siblings have settled.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetpipeError {
    #[error("configuration error: {0}")]
    ConfigParse(String),

    #[error("duplicate task registration: '{0}'")]
    DuplicateTask(String),

    #[error("task not found: '{0}'")]
    TaskNotFound(String),

    #[error("cyclic dependency involving task '{0}'")]
    CyclicDependency(String),

    #[error("task '{task}' failed: {message}")]
    TaskAction { task: String, message: String },

    #[error("pipeline failed; failed tasks: {}", .failed.join(", "))]
    Pipeline { failed: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AssetpipeError>;
