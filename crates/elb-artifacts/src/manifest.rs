use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ArtifactSink;

pub const MANIFEST_SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub relpath: String,
    pub sha256: String,
    pub bytes: u64,
}

/// Index of a run's artifacts, written last as `run_manifest.json`.
///
/// Holds no timestamps or host data: two runs over the same logical inputs
/// produce the same manifest bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_fingerprint: String,
    /// Component fingerprints by name (`config`, `events`, `prices`).
    pub fingerprints: BTreeMap<String, String>,
    pub counts: BTreeMap<String, u64>,
    /// Artifact name -> location and content hash.
    pub artifacts: BTreeMap<String, ArtifactEntry>,
}

impl RunManifest {
    pub fn new(run_fingerprint: impl Into<String>) -> Self {
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION,
            run_fingerprint: run_fingerprint.into(),
            fingerprints: BTreeMap::new(),
            counts: BTreeMap::new(),
            artifacts: BTreeMap::new(),
        }
    }

    /// Write `data` through `sink` and record its hash under `name`.
    pub fn write_artifact(
        &mut self,
        sink: &dyn ArtifactSink,
        name: &str,
        relpath: &str,
        data: &[u8],
    ) -> Result<()> {
        sink.write_bytes(relpath, data)
            .with_context(|| format!("write artifact '{name}' failed: {relpath}"))?;
        self.artifacts.insert(
            name.to_string(),
            ArtifactEntry {
                relpath: relpath.to_string(),
                sha256: elb_canon::sha256_hex(data),
                bytes: data.len() as u64,
            },
        );
        Ok(())
    }

    /// Canonical JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        elb_canon::to_canonical_bytes(self).context("serialize run manifest failed")
    }

    /// Persist the manifest itself. Call after every other artifact.
    pub fn finish(&self, sink: &dyn ArtifactSink, relpath: &str) -> Result<()> {
        let bytes = self.to_bytes()?;
        sink.write_bytes(relpath, &bytes)
            .with_context(|| format!("write run manifest failed: {relpath}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryArtifactSink;

    #[test]
    fn records_hash_and_size() {
        let sink = MemoryArtifactSink::new();
        let mut m = RunManifest::new("abc");
        m.write_artifact(&sink, "events", "abc/e.jsonl", b"{}\n")
            .unwrap();
        let entry = &m.artifacts["events"];
        assert_eq!(entry.bytes, 3);
        assert_eq!(entry.sha256, elb_canon::sha256_hex(b"{}\n"));
        assert_eq!(sink.get("abc/e.jsonl").unwrap(), b"{}\n");
    }

    #[test]
    fn manifest_bytes_are_stable() {
        let mut a = RunManifest::new("r");
        a.counts.insert("input".into(), 2);
        a.fingerprints.insert("events".into(), "e".into());
        let b = a.clone();
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
        assert!(a.to_bytes().unwrap().starts_with(b"{\"artifacts\":{}"));
    }
}
