//! Typed payload field extraction.
//!
//! Integer fields accept a JSON integer or a base-10 integer string
//! (`"100"`, `"-5"`). Floats, decimal strings and other shapes are rejected.

use serde_json::{Map, Value};

use crate::error::LedgerError;

pub(crate) type Payload = Map<String, Value>;

fn missing(event_type: &str, field: &'static str) -> LedgerError {
    LedgerError::MissingField {
        event_type: event_type.to_string(),
        field,
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> LedgerError {
    LedgerError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn as_int(v: &Value, field: &'static str) -> Result<i64, LedgerError> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| invalid(field, format!("expected an i64 integer, got {n}"))),
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| invalid(field, format!("expected an integer string, got {s:?}"))),
        other => Err(invalid(field, format!("expected an integer, got {other}"))),
    }
}

pub(crate) fn req_int(
    payload: &Payload,
    event_type: &str,
    field: &'static str,
) -> Result<i64, LedgerError> {
    match payload.get(field) {
        None | Some(Value::Null) => Err(missing(event_type, field)),
        Some(v) => as_int(v, field),
    }
}

pub(crate) fn req_symbol(payload: &Payload, event_type: &str) -> Result<String, LedgerError> {
    match payload.get("symbol") {
        None | Some(Value::Null) => Err(missing(event_type, "symbol")),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(invalid("symbol", "must not be empty")),
        Some(other) => Err(invalid("symbol", format!("expected a string, got {other}"))),
    }
}

/// Raw `side` text; validation against BUY/SELL happens in the engine.
pub(crate) fn req_side(payload: &Payload, event_type: &str) -> Result<String, LedgerError> {
    match payload.get("side") {
        None | Some(Value::Null) => Err(missing(event_type, "side")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(LedgerError::UnsupportedFillSide {
            side: other.to_string(),
        }),
    }
}
