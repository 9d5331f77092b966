//! elb-events
//!
//! Raw event intake for the ledger bridge:
//!
//! RAW -> NORMALIZE -> SEQUENCE -> IDENTIFY -> DEDUP/ORDER
//!
//! - Normalizer: one untyped JSON object -> [`NormalizedEvent`]
//! - Sequencer: stable `(t, type_rank, input_index)` sort, dense `seq`
//! - Identifier: `event_id = sha256(canonical {event_type, t, seq, source, payload})`
//! - Deduplicator: final `(t, type_rank, seq, event_id)` order, repeated ids dropped
//!
//! Pure deterministic logic (no IO, no time, no randomness).

mod dedup;
mod error;
mod identity;
mod kind;
mod normalizer;
mod sequencer;
mod types;

pub use dedup::{dedup_and_order, render_jsonl, DedupOutcome};
pub use error::EventError;
pub use identity::{compute_event_id, identify, identify_all};
pub use kind::{EventKind, TypeRank, UNRANKED};
pub use normalizer::{normalize_event, normalize_events, DEFAULT_SOURCE};
pub use sequencer::sequence_events;
pub use types::{IdentifiedEvent, NormalizedEvent, SequencedEvent};
