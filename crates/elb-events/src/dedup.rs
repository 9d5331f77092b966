//! Final ordering and deduplication.
//!
//! Sort key `(t, type_rank, seq, event_id)` is fully content-derived, so the
//! resulting order never depends on the caller's array order. Repeated
//! `event_id`s after the first are dropped and counted.

use std::collections::BTreeSet;

use elb_canon::CanonError;

use crate::kind::TypeRank;
use crate::types::IdentifiedEvent;

/// The canonical event list plus how many repeats were removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DedupOutcome {
    pub events: Vec<IdentifiedEvent>,
    pub duplicates_dropped: usize,
}

pub fn dedup_and_order(mut events: Vec<IdentifiedEvent>, ranks: &TypeRank) -> DedupOutcome {
    events.sort_by(|a, b| {
        (a.t, ranks.rank_of_kind(&a.kind), a.seq, &a.event_id).cmp(&(
            b.t,
            ranks.rank_of_kind(&b.kind),
            b.seq,
            &b.event_id,
        ))
    });

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut kept = Vec::with_capacity(events.len());
    let mut duplicates_dropped = 0usize;
    for ev in events {
        if seen.insert(ev.event_id.clone()) {
            kept.push(ev);
        } else {
            duplicates_dropped += 1;
        }
    }

    DedupOutcome {
        events: kept,
        duplicates_dropped,
    }
}

/// One canonical JSON object per line, each terminated by `\n`.
pub fn render_jsonl(events: &[IdentifiedEvent]) -> Result<Vec<u8>, CanonError> {
    let mut out = Vec::new();
    for ev in events {
        out.extend_from_slice(&elb_canon::to_canonical_bytes(ev)?);
        out.push(b'\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::EventKind;
    use serde_json::Map;

    fn ev(id: &str, kind: EventKind, t: i64, seq: u64) -> IdentifiedEvent {
        IdentifiedEvent {
            event_id: id.to_string(),
            kind,
            t,
            seq,
            source: "beta".to_string(),
            payload: Map::new(),
        }
    }

    #[test]
    fn drops_repeated_ids_and_counts_them() {
        let out = dedup_and_order(
            vec![
                ev("bb", EventKind::Fill, 1, 1),
                ev("aa", EventKind::Price, 1, 0),
                ev("bb", EventKind::Fill, 1, 1),
            ],
            &TypeRank::default(),
        );
        assert_eq!(out.duplicates_dropped, 1);
        let ids: Vec<_> = out.events.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["aa", "bb"]);
    }

    #[test]
    fn order_is_independent_of_input_order() {
        let a = vec![
            ev("c", EventKind::Fee, 2, 2),
            ev("a", EventKind::Price, 1, 0),
            ev("b", EventKind::Fill, 1, 1),
        ];
        let mut b = a.clone();
        b.reverse();
        let ranks = TypeRank::default();
        assert_eq!(dedup_and_order(a, &ranks), dedup_and_order(b, &ranks));
    }

    #[test]
    fn jsonl_is_one_sorted_object_per_line() {
        let bytes = render_jsonl(&[ev("x", EventKind::Price, 3, 0)]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\"event_id\":\"x\",\"event_type\":\"Price\",\"payload\":{},\"seq\":0,\"source\":\"beta\",\"t\":3}\n"
        );
    }

    #[test]
    fn empty_log_renders_empty() {
        assert!(render_jsonl(&[]).unwrap().is_empty());
    }
}
