// src/config/mod.rs

//! Configuration loading and placeholder resolution.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Resolve `<%= var %>` placeholders against a variables document
//!   (`resolver.rs`).
//! - Load both documents from disk and produce the immutable, fully
//!   resolved [`Config`] (`loader.rs`).

pub mod loader;
pub mod model;
pub mod resolver;

pub use loader::{load, load_with_vars};
pub use model::Config;
pub use resolver::{flatten_vars, merge_vars, resolve, VarMap};
