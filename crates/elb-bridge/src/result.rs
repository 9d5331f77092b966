use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fingerprint::RunFingerprints;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Raw events handed in.
    pub input: u64,
    /// Events that passed normalization (equals `input` on success).
    pub normalized: u64,
    /// Events left after duplicate removal.
    pub deduped: u64,
    /// Events the ledger reported as state-mutating.
    pub applied: u64,
    pub duplicates_dropped: u64,
}

impl Counts {
    pub(crate) fn as_map(&self) -> BTreeMap<String, u64> {
        BTreeMap::from([
            ("applied".to_string(), self.applied),
            ("deduped".to_string(), self.deduped),
            ("duplicates_dropped".to_string(), self.duplicates_dropped),
            ("input".to_string(), self.input),
            ("normalized".to_string(), self.normalized),
        ])
    }
}

/// Summary of one completed run. Returned to the caller, not persisted
/// (the run manifest carries the same facts).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResult {
    pub run_fingerprint: String,
    pub counts: Counts,
    /// Artifact name -> path relative to the sink root.
    pub artifact_relpaths: BTreeMap<String, String>,
    pub fingerprints: RunFingerprints,
}
