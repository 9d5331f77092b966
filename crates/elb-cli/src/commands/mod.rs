//! Command handlers for the `elb` binary.
//!
//! Shared input loading lives here; `run` holds the bridge commands.

pub mod run;

use anyhow::{bail, Context, Result};
use elb_config::LoadedConfig;
use serde_json::Value;
use std::fs;

use crate::RunInputs;

/// Read a UTF-8 text file, dropping a leading BOM.
fn read_text(path: &str, what: &str) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read {what} failed: {path}"))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    String::from_utf8(bytes.to_vec()).with_context(|| format!("{what} must be UTF-8 text: {path}"))
}

/// Raw events from a JSON array or JSONL (blank lines skipped).
pub fn load_events(path: &str) -> Result<Vec<Value>> {
    let raw = read_text(path, "events file")?;
    let trimmed = raw.trim_start();

    if trimmed.starts_with('[') {
        let v: Value = serde_json::from_str(trimmed).context("events file must contain valid JSON")?;
        return match v {
            Value::Array(items) => Ok(items),
            _ => bail!("events file: expected a JSON array"),
        };
    }

    let mut events = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v: Value = serde_json::from_str(line)
            .with_context(|| format!("events file line {} is not valid JSON", lineno + 1))?;
        events.push(v);
    }
    Ok(events)
}

/// The prices manifest (file), the prices reference (string), or `null`.
pub fn load_prices(inputs: &RunInputs) -> Result<Value> {
    if let Some(p) = &inputs.prices {
        let raw = read_text(p, "prices manifest")?;
        return serde_json::from_str(raw.trim()).context("prices manifest must contain valid JSON");
    }
    Ok(inputs
        .prices_ref
        .clone()
        .map(Value::String)
        .unwrap_or(Value::Null))
}

/// Layered settings; no paths means built-in defaults.
pub fn load_settings(inputs: &RunInputs) -> Result<LoadedConfig> {
    let path_refs: Vec<&str> = inputs.config_paths.iter().map(|s| s.as_str()).collect();
    elb_config::load_layered_yaml(&path_refs)
}
