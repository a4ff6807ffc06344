// src/watch/mod.rs

//! File watching and change-triggered rebuilds.
//!
//! This module is responsible for:
//! - Compiling watch-binding glob patterns per binding (`patterns.rs`).
//! - Collapsing rapid change bursts into single triggers (`debounce.rs`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) that
//!   dispatches bound tasks through the scheduler (`watcher.rs`).
//!
//! It does **not** know about task prerequisites; it only turns filesystem
//! changes into task-level triggers.

pub mod debounce;
pub mod patterns;
pub mod watcher;

pub use debounce::Debouncer;
pub use patterns::CompiledBinding;
pub use watcher::{StopHandle, Watcher};
