// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::Config;
use crate::config::resolver::{self, VarMap};
use crate::errors::{AssetpipeError, Result};

/// Default base-config location relative to the working directory.
pub const BASE_CONFIG_PATH: &str = "Assetpipe.toml";

/// Default variables-document location relative to the working directory.
pub const VARS_CONFIG_PATH: &str = "assetpipe.vars.toml";

/// Optional rc file naming the package-manager dependency directory.
pub const VENDOR_RC_PATH: &str = ".vendorrc";

/// Load and resolve the configuration from the given paths.
///
/// Seeds the caller-supplied variables (currently just `vendorPath`, read
/// once from [`VENDOR_RC_PATH`]) before delegating to [`load_with_vars`].
pub fn load(base_path: impl AsRef<Path>, vars_path: impl AsRef<Path>) -> Result<Config> {
    let extra = seed_vars(Path::new(VENDOR_RC_PATH));
    load_with_vars(base_path, vars_path, extra)
}

/// Load the base document and the variables document, resolve every
/// `<%= var %>` placeholder, and parse the result into a [`Config`].
///
/// Fails with `ConfigParse` when either document is unreadable or not valid
/// TOML, or when a placeholder survives substitution. The returned value is
/// computed once at startup and shared read-only for the process lifetime.
pub fn load_with_vars(
    base_path: impl AsRef<Path>,
    vars_path: impl AsRef<Path>,
    extra: VarMap,
) -> Result<Config> {
    let base_path = base_path.as_ref();
    let vars_path = vars_path.as_ref();

    let base_text = fs::read_to_string(base_path).map_err(|e| {
        AssetpipeError::ConfigParse(format!("reading config file at {base_path:?}: {e}"))
    })?;

    let vars_text = fs::read_to_string(vars_path).map_err(|e| {
        AssetpipeError::ConfigParse(format!("reading variables file at {vars_path:?}: {e}"))
    })?;

    let vars_table: toml::Table = toml::from_str(&vars_text).map_err(|e| {
        AssetpipeError::ConfigParse(format!("parsing variables from {vars_path:?}: {e}"))
    })?;

    let file_vars = resolver::flatten_vars(&vars_table);
    let merged = resolver::merge_vars(extra, file_vars);
    debug!(vars = merged.len(), "merged substitution variables");

    let resolved = resolver::resolve(&base_text, &merged)?;

    let config: Config = toml::from_str(&resolved).map_err(|e| {
        AssetpipeError::ConfigParse(format!("parsing resolved config from {base_path:?}: {e}"))
    })?;

    Ok(config)
}

/// Caller-supplied seed variables, applied before the file-declared ones.
pub fn seed_vars(vendor_rc: &Path) -> VarMap {
    let mut vars = VarMap::new();
    vars.insert("vendorPath".to_string(), detect_vendor_dir(vendor_rc));
    vars
}

/// Read the dependency directory from the rc file's `dir` key.
///
/// A missing or malformed rc file falls back to `"vendor"`.
fn detect_vendor_dir(path: &Path) -> String {
    let fallback = || "vendor".to_string();

    match fs::read_to_string(path) {
        Ok(text) => toml::from_str::<toml::Table>(&text)
            .ok()
            .and_then(|table| {
                table
                    .get("dir")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(fallback),
        Err(_) => fallback(),
    }
}
