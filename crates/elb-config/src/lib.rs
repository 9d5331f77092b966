//! Layered YAML settings.
//!
//! Documents merge in order (earlier = base, later = override; objects merge
//! key by key, everything else is replaced). The merged tree is hashed as
//! canonical JSON, then deserialized into [`BridgeSettings`] with unknown keys
//! rejected at every level.

use anyhow::{Context, Result};
use elb_bridge::BridgeConfig;
use elb_ledger::LedgerConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;

fn default_out_dir() -> String {
    "out".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Sink root; runs land in `<out_dir>/<run_fingerprint>/`.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeSettings {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// sha256 of `canonical_json`.
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    pub settings: BridgeSettings,
}

/// Read each path in order and merge the documents as layers.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("read config layer {p}")))
        .collect::<Result<Vec<String>>>()?;
    let docs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&docs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Default::default());
    for (layer, raw) in yaml_docs.iter().enumerate() {
        if let Some(doc) = parse_layer(layer, raw)? {
            merge_into(&mut merged, doc);
        }
    }

    // Floats are refused here too, so the hash never depends on float rendering.
    let canonical_json =
        elb_canon::to_canonical_string(&merged).context("canonical config encoding failed")?;
    let config_hash = elb_canon::sha256_hex(canonical_json.as_bytes());

    let settings: BridgeSettings =
        serde_json::from_value(merged.clone()).context("config does not match settings schema")?;

    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
        settings,
    })
}

/// `None` for a layer that is blank, comment-only or `~`.
fn parse_layer(layer: usize, raw: &str) -> Result<Option<Value>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {layer}"))?;
    let json = serde_json::to_value(yaml)
        .with_context(|| format!("layer {layer} is not representable as json"))?;
    Ok((!json.is_null()).then_some(json))
}

/// Objects merge key by key; any other overlay value replaces the base.
fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_into(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overrides_leaves_and_keeps_siblings() {
        let mut merged =
            json!({"ledger": {"money_scale": 100, "price_scale": 100}, "x": [1, 2]});
        merge_into(&mut merged, json!({"ledger": {"price_scale": 10}, "x": [3]}));
        assert_eq!(
            merged,
            json!({"ledger": {"money_scale": 100, "price_scale": 10}, "x": [3]})
        );
    }

    #[test]
    fn empty_layers_yield_defaults() {
        let loaded = load_layered_yaml_from_strings(&["", "{}"]).unwrap();
        assert_eq!(loaded.settings, BridgeSettings::default());
        assert_eq!(loaded.canonical_json, "{}");
    }

    #[test]
    fn scalar_overlay_replaces_object() {
        let mut merged = json!({"output": {"out_dir": "a"}});
        merge_into(&mut merged, json!({"output": 7}));
        assert_eq!(merged, json!({"output": 7}));
    }

    #[test]
    fn null_and_comment_only_layers_are_skipped() {
        let loaded = load_layered_yaml_from_strings(&[
            "output:\n  out_dir: runs\n",
            "~",
            "# nothing here\n",
        ])
        .unwrap();
        assert_eq!(loaded.settings.output.out_dir, "runs");
    }

    #[test]
    fn bad_layer_is_named_in_the_error() {
        let err = load_layered_yaml_from_strings(&["{}", "a: [1"]).unwrap_err();
        assert!(format!("{err:#}").contains("layer 1"));
    }
}
