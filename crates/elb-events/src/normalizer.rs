//! Raw event normalization.
//!
//! Converts one untyped JSON object into a [`NormalizedEvent`]:
//!
//! - `event_type` is required (non-empty string)
//! - logical time comes from the first present of `t`, `ts_sim`, `idx`
//! - `source` defaults to [`DEFAULT_SOURCE`]
//! - `payload` defaults to `{}` and must be an object
//! - no float anywhere in the payload (reported with a JSON path)
//!
//! It does **not** interpret the payload; that is the ledger engine's job.

use serde_json::{Map, Value};

use crate::error::EventError;
use crate::kind::EventKind;
use crate::types::NormalizedEvent;

/// Source label applied when the raw event carries none.
pub const DEFAULT_SOURCE: &str = "beta";

/// Logical-time keys in priority order.
const TIME_KEYS: [&str; 3] = ["t", "ts_sim", "idx"];

/// Normalize a single raw event.
pub fn normalize_event(raw: &Value) -> Result<NormalizedEvent, EventError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| EventError::schema("raw event must be a JSON object"))?;

    let event_type = match obj.get("event_type") {
        Some(Value::String(s)) if !s.is_empty() => s.as_str(),
        Some(Value::String(_)) => return Err(EventError::schema("event_type is empty")),
        Some(_) => return Err(EventError::schema("event_type must be a string")),
        None => return Err(EventError::schema("missing event_type")),
    };

    let t = extract_time(obj)?;

    let source = match obj.get("source") {
        None | Some(Value::Null) => DEFAULT_SOURCE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(EventError::schema("source must be a string")),
    };

    let payload = match obj.get("payload") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(m)) => m.clone(),
        Some(_) => return Err(EventError::schema("payload must be a JSON object")),
    };
    if let Some(raw_payload) = obj.get("payload") {
        elb_canon::ensure_no_floats(raw_payload, "$.payload")?;
    }

    let seq = match obj.get("seq") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) if n.is_f64() => {
            return Err(EventError::FloatForbidden {
                index: None,
                path: "$.seq".to_string(),
            })
        }
        Some(v) => Some(
            v.as_u64()
                .ok_or_else(|| EventError::schema("seq must be a non-negative integer"))?,
        ),
    };

    Ok(NormalizedEvent {
        kind: EventKind::parse(event_type),
        t,
        seq,
        source,
        payload,
    })
}

fn extract_time(obj: &Map<String, Value>) -> Result<i64, EventError> {
    for key in TIME_KEYS {
        match obj.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::Number(n)) if n.is_f64() => {
                return Err(EventError::FloatForbidden {
                    index: None,
                    path: format!("$.{key}"),
                })
            }
            Some(v) => {
                return v
                    .as_i64()
                    .ok_or_else(|| EventError::schema(format!("{key} must be an integer")));
            }
        }
    }
    Err(EventError::schema("missing logical time (t, ts_sim or idx)"))
}

/// Normalize a batch, pairing each event with its input index.
///
/// Fails on the first bad event; the error carries its input index.
pub fn normalize_events(raw: &[Value]) -> Result<Vec<(usize, NormalizedEvent)>, EventError> {
    raw.iter()
        .enumerate()
        .map(|(i, ev)| normalize_event(ev).map(|n| (i, n)).map_err(|e| e.at_index(i)))
        .collect()
}
