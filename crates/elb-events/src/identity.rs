//! Content-derived event identity.
//!
//! `event_id = sha256_hex(canonical_json({event_type, t, seq, source, payload}))`
//!
//! Two events are the same event iff these five fields are value-equal. Since
//! `seq` is derived, this is an identity over *sequenced* content, not general
//! semantic equality.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::EventError;
use crate::kind::EventKind;
use crate::types::{IdentifiedEvent, SequencedEvent};

#[derive(Serialize)]
struct IdentityFields<'a> {
    event_type: &'a EventKind,
    t: i64,
    seq: u64,
    source: &'a str,
    payload: &'a Map<String, Value>,
}

/// Compute the event id of a sequenced event.
pub fn compute_event_id(ev: &SequencedEvent) -> Result<String, EventError> {
    let fields = IdentityFields {
        event_type: &ev.kind,
        t: ev.t,
        seq: ev.seq,
        source: &ev.source,
        payload: &ev.payload,
    };
    Ok(elb_canon::canonical_sha256_hex(&fields)?)
}

pub fn identify(ev: SequencedEvent) -> Result<IdentifiedEvent, EventError> {
    let event_id = compute_event_id(&ev)?;
    Ok(IdentifiedEvent {
        event_id,
        kind: ev.kind,
        t: ev.t,
        seq: ev.seq,
        source: ev.source,
        payload: ev.payload,
    })
}

pub fn identify_all(events: Vec<SequencedEvent>) -> Result<Vec<IdentifiedEvent>, EventError> {
    events.into_iter().map(identify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ev(seq: u64, source: &str, qty: i64) -> SequencedEvent {
        let payload = json!({"qty_int": qty, "side": "BUY"})
            .as_object()
            .cloned()
            .unwrap();
        SequencedEvent {
            kind: EventKind::Fill,
            t: 10,
            seq,
            source: source.to_string(),
            payload,
        }
    }

    #[test]
    fn id_is_stable_hex_sha256() {
        let a = compute_event_id(&ev(0, "beta", 1)).unwrap();
        let b = compute_event_id(&ev(0, "beta", 1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn id_matches_canonical_hash_of_the_five_fields() {
        let expected = elb_canon::canonical_sha256_hex(&json!({
            "payload": {"side": "BUY", "qty_int": 1},
            "source": "beta",
            "seq": 0,
            "t": 10,
            "event_type": "Fill"
        }))
        .unwrap();
        assert_eq!(compute_event_id(&ev(0, "beta", 1)).unwrap(), expected);
    }

    #[test]
    fn each_field_participates() {
        let base = compute_event_id(&ev(0, "beta", 1)).unwrap();
        assert_ne!(base, compute_event_id(&ev(1, "beta", 1)).unwrap());
        assert_ne!(base, compute_event_id(&ev(0, "alpha", 1)).unwrap());
        assert_ne!(base, compute_event_id(&ev(0, "beta", 2)).unwrap());
    }
}
