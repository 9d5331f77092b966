//! Event kinds and the deterministic tie-break rank.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Rank assigned to any event kind missing from the rank table.
pub const UNRANKED: i64 = 999;

/// The closed set of event kinds the bridge knows by name.
///
/// Only `Price`, `Fill` and `Fee` move ledger state. The remaining named kinds
/// are recorded but never mutate anything. Every other string lands in
/// [`EventKind::Other`], which carries the original text so the canonical log
/// reproduces the input exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Price,
    Fill,
    Fee,
    OrderIntent,
    Order,
    Cancel,
    Reject,
    Adjustment,
    SnapshotMarker,
    Other(String),
}

impl EventKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "Price" => EventKind::Price,
            "Fill" => EventKind::Fill,
            "Fee" => EventKind::Fee,
            "OrderIntent" => EventKind::OrderIntent,
            "Order" => EventKind::Order,
            "Cancel" => EventKind::Cancel,
            "Reject" => EventKind::Reject,
            "Adjustment" => EventKind::Adjustment,
            "SnapshotMarker" => EventKind::SnapshotMarker,
            other => EventKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Price => "Price",
            EventKind::Fill => "Fill",
            EventKind::Fee => "Fee",
            EventKind::OrderIntent => "OrderIntent",
            EventKind::Order => "Order",
            EventKind::Cancel => "Cancel",
            EventKind::Reject => "Reject",
            EventKind::Adjustment => "Adjustment",
            EventKind::SnapshotMarker => "SnapshotMarker",
            EventKind::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(EventKind::parse(&s))
    }
}

// ---------------------------------------------------------------------------
// TypeRank
// ---------------------------------------------------------------------------

/// Tie-break priority per event type: lower ranks sort first within one
/// logical time `t`. Kinds absent from the table rank [`UNRANKED`].
///
/// A configured table replaces the default table wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRank(BTreeMap<String, i64>);

impl TypeRank {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn rank_of(&self, event_type: &str) -> i64 {
        self.0.get(event_type).copied().unwrap_or(UNRANKED)
    }

    pub fn rank_of_kind(&self, kind: &EventKind) -> i64 {
        self.rank_of(kind.as_str())
    }

    pub fn with(mut self, event_type: impl Into<String>, rank: i64) -> Self {
        self.0.insert(event_type.into(), rank);
        self
    }
}

/// Prices first so marks are current before fills at the same `t`; order
/// lifecycle before fills; fees after the fill that caused them.
impl Default for TypeRank {
    fn default() -> Self {
        [
            ("Price", 10),
            ("OrderIntent", 20),
            ("Order", 30),
            ("Cancel", 40),
            ("Reject", 50),
            ("Fill", 60),
            ("Fee", 70),
            ("Adjustment", 80),
            ("SnapshotMarker", 90),
        ]
        .into_iter()
        .fold(Self::empty(), |ranks, (kind, rank)| ranks.with(kind, rank))
    }
}
