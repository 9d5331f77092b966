//! Sequence assignment.
//!
//! # Sort key
//!
//! `(t, type_rank(event_type), input_index)` ascending, stable.
//!
//! # Dense seq
//!
//! Walking the sorted list, every *distinct* logical event (canonical
//! `{event_type, t, source, payload}`) takes the next counter value starting at
//! 0. An exact repeat of an earlier logical event takes the seq of its first
//! occurrence, so both copies hash to the same `event_id` and the deduplicator
//! can drop the repeat.
//!
//! A caller-supplied `seq` is never authoritative: it must equal the derived
//! value or the batch fails with [`EventError::SeqMismatch`].

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::EventError;
use crate::kind::{EventKind, TypeRank};
use crate::types::{NormalizedEvent, SequencedEvent};

#[derive(Serialize)]
struct ContentKey<'a> {
    event_type: &'a EventKind,
    t: i64,
    source: &'a str,
    payload: &'a Map<String, Value>,
}

fn content_key(ev: &NormalizedEvent) -> Result<Vec<u8>, EventError> {
    let key = ContentKey {
        event_type: &ev.kind,
        t: ev.t,
        source: &ev.source,
        payload: &ev.payload,
    };
    Ok(elb_canon::to_canonical_bytes(&key)?)
}

/// Assign the final `seq` to every normalized event.
///
/// `events` pairs each event with its position in the caller's input array.
/// Output is in sequence order.
pub fn sequence_events(
    events: Vec<(usize, NormalizedEvent)>,
    ranks: &TypeRank,
) -> Result<Vec<SequencedEvent>, EventError> {
    let mut keyed: Vec<(i64, usize, NormalizedEvent)> = events
        .into_iter()
        .map(|(idx, ev)| (ranks.rank_of_kind(&ev.kind), idx, ev))
        .collect();

    // slice::sort_by is stable.
    keyed.sort_by(|a, b| (a.2.t, a.0, a.1).cmp(&(b.2.t, b.0, b.1)));

    let mut first_seen: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    let mut next_seq: u64 = 0;
    let mut out = Vec::with_capacity(keyed.len());

    for (_, idx, ev) in keyed {
        let content = content_key(&ev)?;
        let derived = match first_seen.get(&content) {
            Some(seq) => *seq,
            None => {
                let seq = next_seq;
                next_seq += 1;
                first_seen.insert(content, seq);
                seq
            }
        };

        if let Some(supplied) = ev.seq {
            if supplied != derived {
                return Err(EventError::SeqMismatch {
                    index: idx,
                    supplied,
                    derived,
                });
            }
        }

        out.push(SequencedEvent {
            kind: ev.kind,
            t: ev.t,
            seq: derived,
            source: ev.source,
            payload: ev.payload,
        });
    }

    Ok(out)
}
