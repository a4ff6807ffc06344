// src/config/resolver.rs

//! `<%= var %>` placeholder resolution over the raw base-config text.
//!
//! The variables document is a TOML table, possibly nested; nested tables
//! flatten to dot-joined keys (`dist.css`). Substitution is textual and
//! case-insensitive, and happens *before* the base document is parsed, so
//! placeholders can appear anywhere in it. A placeholder that survives
//! substitution is an error: TOML would parse `"<%= foo %>"` as a plain
//! string and the mistake would only surface much later, inside some tool
//! invocation.

use std::collections::BTreeMap;

use regex::{NoExpand, Regex, RegexBuilder};

use crate::errors::{AssetpipeError, Result};

/// Flattened substitution variables: dotted key -> literal value text.
pub type VarMap = BTreeMap<String, String>;

/// Flatten a parsed TOML table into a [`VarMap`].
///
/// Scalar leaves are rendered as their literal text (strings unquoted).
/// Arrays have no scalar rendering and are skipped.
pub fn flatten_vars(table: &toml::Table) -> VarMap {
    let mut out = VarMap::new();
    flatten_into(&mut out, "", table);
    out
}

fn flatten_into(out: &mut VarMap, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            toml::Value::Table(nested) => flatten_into(out, &full, nested),
            toml::Value::String(s) => {
                out.insert(full, s.clone());
            }
            toml::Value::Integer(i) => {
                out.insert(full, i.to_string());
            }
            toml::Value::Float(f) => {
                out.insert(full, f.to_string());
            }
            toml::Value::Boolean(b) => {
                out.insert(full, b.to_string());
            }
            toml::Value::Datetime(dt) => {
                out.insert(full, dt.to_string());
            }
            toml::Value::Array(_) => {}
        }
    }
}

/// Merge caller-supplied extra variables with file-declared ones.
///
/// File-declared variables win on key collision; the extras are seed
/// defaults (e.g. the detected vendor directory).
pub fn merge_vars(extra: VarMap, file_vars: VarMap) -> VarMap {
    let mut merged = extra;
    merged.extend(file_vars);
    merged
}

/// Substitute every `<%= key %>` token (case-insensitive, optional inner
/// whitespace) with the literal value text for each variable in `vars`.
pub fn substitute(text: &str, vars: &VarMap) -> Result<String> {
    let mut out = text.to_string();

    for (key, value) in vars {
        let pattern = format!(r"<%=\s*{}\s*%>", regex::escape(key));
        let re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                AssetpipeError::ConfigParse(format!(
                    "invalid substitution variable name '{key}': {e}"
                ))
            })?;
        out = re.replace_all(&out, NoExpand(value)).into_owned();
    }

    Ok(out)
}

/// Fail if any `<%= ... %>` token survived substitution, naming the first
/// unresolved variable.
pub fn check_resolved(text: &str) -> Result<()> {
    let re = Regex::new(r"<%=\s*([A-Za-z0-9_.\-]+)\s*%>")
        .map_err(|e| AssetpipeError::ConfigParse(format!("placeholder scan: {e}")))?;

    if let Some(caps) = re.captures(text) {
        return Err(AssetpipeError::ConfigParse(format!(
            "unresolved configuration placeholder '<%= {} %>'",
            &caps[1]
        )));
    }

    Ok(())
}

/// Substitute all variables and verify nothing is left unresolved.
///
/// Resolving text with zero placeholders returns it unchanged.
pub fn resolve(base_text: &str, vars: &VarMap) -> Result<String> {
    let substituted = substitute(base_text, vars)?;
    check_resolved(&substituted)?;
    Ok(substituted)
}
