//! `${VAR}` substitution in config values.
//!
//! Only uppercase names (`[A-Z_][A-Z0-9_]*`) are recognised. `$${VAR}` is an
//! escape and becomes the literal text `${VAR}`.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

/// Matches an optional escaping `$` followed by `${NAME}`.
static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute env var references everywhere in a value tree, using the process env.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, |name| std::env::var(name).ok())
}

/// Substitute env var references using `lookup`. Unset or empty vars are errors.
pub fn resolve_env_vars_with(
    value: &Value,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Value> {
    Ok(walk(value, &lookup, "")?)
}

fn walk(
    value: &Value,
    lookup: &impl Fn(&str) -> Option<String>,
    path: &str,
) -> Result<Value, MissingEnvVarError> {
    Ok(match value {
        Value::String(s) => Value::String(substitute(s, lookup, path)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| walk(v, lookup, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, v) in map {
                let child = if path.is_empty() { key.clone() } else { format!("{path}.{key}") };
                out.insert(key.clone(), walk(v, lookup, &child)?);
            }
            Value::Object(out)
        }
        other => other.clone(),
    })
}

fn substitute(
    s: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    path: &str,
) -> Result<String, MissingEnvVarError> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing = None;
    let replaced = ENV_REF.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match lookup(name).filter(|v| !v.is_empty()) {
            Some(v) => v,
            None => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    match missing {
        Some(err) => Err(err),
        None => Ok(replaced.into_owned()),
    }
}

/// Every env var name a value tree refers to, sorted and deduplicated.
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    fn collect(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.extend(
                ENV_REF
                    .captures_iter(s)
                    .filter(|c| c[1].is_empty())
                    .map(|c| c[2].to_string()),
            ),
            Value::Array(items) => items.iter().for_each(|v| collect(v, out)),
            Value::Object(map) => map.values().for_each(|v| collect(v, out)),
            _ => {}
        }
    }
    let mut vars = Vec::new();
    collect(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}
