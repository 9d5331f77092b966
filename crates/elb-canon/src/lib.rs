//! elb-canon
//!
//! Canonical JSON encoding and content hashing.
//!
//! Every content address in the workspace (event ids, run fingerprints,
//! config hashes, artifact digests) is computed over the bytes produced here,
//! so the encoding must be a pure function of the *value*:
//!
//! - object keys are sorted at every nesting level (byte order), regardless of
//!   whether `serde_json` was built with `preserve_order`
//! - no whitespace between tokens
//! - floats are rejected, with a JSON-path locator for the first offender
//! - integers render as plain base-10 digits
//! - decimal types reach the encoder as strings through their own `Serialize`
//!   impl (e.g. `rust_decimal::Decimal`), and are kept as strings
//!
//! Pure: no IO, no time, no randomness.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Root of every JSON-path locator produced by this crate.
pub const ROOT_PATH: &str = "$";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while encoding a value canonically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// A float was found. `path` is a JSON-path locator (`$.payload.px[2]`).
    FloatForbidden { path: String },
    /// The value could not be turned into JSON at all.
    Serialize(String),
}

impl fmt::Display for CanonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonError::FloatForbidden { path } => {
                write!(f, "float values are forbidden in canonical JSON (at {path})")
            }
            CanonError::Serialize(msg) => write!(f, "canonical JSON serialize failed: {msg}"),
        }
    }
}

impl std::error::Error for CanonError {}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a JSON value canonically.
///
/// Byte-identical for value-equal inputs, whatever the key insertion order.
pub fn dumps_canonical(value: &Value) -> Result<Vec<u8>, CanonError> {
    let mut out = Vec::with_capacity(128);
    write_value(value, ROOT_PATH, &mut out)?;
    Ok(out)
}

/// Serialize any `Serialize` value through `serde_json` and encode it
/// canonically.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonError> {
    let v = serde_json::to_value(value).map_err(|e| CanonError::Serialize(e.to_string()))?;
    dumps_canonical(&v)
}

/// Canonical encoding as a `String` (canonical JSON is always valid UTF-8).
pub fn to_canonical_string<T: Serialize + ?Sized>(value: &T) -> Result<String, CanonError> {
    let bytes = to_canonical_bytes(value)?;
    String::from_utf8(bytes).map_err(|e| CanonError::Serialize(e.to_string()))
}

fn write_value(v: &Value, path: &str, out: &mut Vec<u8>) -> Result<(), CanonError> {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => {
            if n.is_f64() {
                return Err(CanonError::FloatForbidden {
                    path: path.to_string(),
                });
            }
            out.extend_from_slice(n.to_string().as_bytes());
        }
        Value::String(s) => write_str(s, out)?,
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, &index_path(path, i), out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_str(key, out)?;
                out.push(b':');
                write_value(&map[key.as_str()], &key_path(path, key), out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_str(s: &str, out: &mut Vec<u8>) -> Result<(), CanonError> {
    serde_json::to_writer(&mut *out, s).map_err(|e| CanonError::Serialize(e.to_string()))
}

// ---------------------------------------------------------------------------
// Float scanning
// ---------------------------------------------------------------------------

/// Return the JSON path of the first float inside `value`, if any.
///
/// Traversal order matches the encoder (sorted keys), so the reported path is
/// stable for value-equal inputs.
pub fn find_float(value: &Value) -> Option<String> {
    find_float_at(value, ROOT_PATH)
}

/// Like [`find_float`], with paths rooted at `root` (e.g. `"$.payload"`).
pub fn find_float_at(value: &Value, root: &str) -> Option<String> {
    match value {
        Value::Number(n) if n.is_f64() => Some(root.to_string()),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| find_float_at(item, &index_path(root, i))),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            keys.into_iter()
                .find_map(|k| find_float_at(&map[k.as_str()], &key_path(root, k)))
        }
        _ => None,
    }
}

/// Fail with [`CanonError::FloatForbidden`] if `value` contains a float.
pub fn ensure_no_floats(value: &Value, root: &str) -> Result<(), CanonError> {
    match find_float_at(value, root) {
        Some(path) => Err(CanonError::FloatForbidden { path }),
        None => Ok(()),
    }
}

fn key_path(parent: &str, key: &str) -> String {
    format!("{parent}.{key}")
}

fn index_path(parent: &str, i: usize) -> String {
    format!("{parent}[{i}]")
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Lowercase hex sha256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// sha256 over the canonical encoding of `value`.
pub fn canonical_sha256_hex<T: Serialize + ?Sized>(value: &T) -> Result<String, CanonError> {
    let bytes = to_canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}
