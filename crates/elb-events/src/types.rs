use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kind::EventKind;

/// One raw event after validation and shaping.
///
/// Transient: produced once per input event and discarded once the canonical
/// log is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub kind: EventKind,
    /// Logical time (from `t`, `ts_sim` or `idx`).
    pub t: i64,
    /// Caller-supplied sequence number; a consistency check only.
    pub seq: Option<u64>,
    pub source: String,
    pub payload: Map<String, Value>,
}

/// A normalized event with its bridge-derived `seq`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencedEvent {
    pub kind: EventKind,
    pub t: i64,
    pub seq: u64,
    pub source: String,
    pub payload: Map<String, Value>,
}

/// A sequenced event plus its content hash. This is the record written to
/// `normalized_beta_events.jsonl` and handed to the ledger engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedEvent {
    pub event_id: String,
    #[serde(rename = "event_type")]
    pub kind: EventKind,
    pub t: i64,
    pub seq: u64,
    pub source: String,
    pub payload: Map<String, Value>,
}

impl IdentifiedEvent {
    pub fn event_type(&self) -> &str {
        self.kind.as_str()
    }
}
