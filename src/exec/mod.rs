// src/exec/mod.rs

//! Process execution layer.
//!
//! Every asset transform is an opaque external command; this module runs
//! them with `tokio::process::Command` and maps exit status to step
//! success/failure. Fire-and-forget spawning covers the notification and
//! live-reload sinks.

pub mod shell;

pub use shell::{fill_template, run_step, run_steps, spawn_fire_and_forget};
