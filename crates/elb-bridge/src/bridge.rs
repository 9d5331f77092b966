use anyhow::{Context, Result};
use elb_artifacts::{ArtifactSink, RunManifest};
use elb_events::{
    dedup_and_order, identify_all, normalize_events, render_jsonl, sequence_events,
    IdentifiedEvent,
};
use elb_ledger::LedgerEngineLike;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::fingerprint::RunFingerprints;
use crate::result::{BridgeResult, Counts};

/// Artifact file names under `<run_fingerprint>/`.
pub mod artifact_names {
    pub const EVENTS_LOG: &str = "normalized_beta_events.jsonl";
    pub const APPLIED_LOG: &str = "ledger_applied_events.jsonl";
    pub const FINAL_STATE: &str = "ledger_final_state.json";
    pub const EQUITY_CURVE: &str = "equity_curve.jsonl";
    pub const RUN_MANIFEST: &str = "run_manifest.json";
}

use self::artifact_names::{APPLIED_LOG, EQUITY_CURVE, EVENTS_LOG, FINAL_STATE, RUN_MANIFEST};

/// `get_state()` keys copied into each equity snapshot (absent keys -> null).
const SNAPSHOT_FIELDS: [&str; 6] = [
    "cash_int",
    "equity_int",
    "realized_pnl_int",
    "unrealized_pnl_int",
    "fees_paid_int",
    "positions",
];

/// The pure half of a run: canonical log and content address, no I/O.
#[derive(Clone, Debug)]
pub struct PreparedRun {
    /// Final order, duplicates removed.
    pub events: Vec<IdentifiedEvent>,
    /// Bytes of `normalized_beta_events.jsonl`.
    pub events_jsonl: Vec<u8>,
    pub fingerprints: RunFingerprints,
    /// `applied` is always 0 here.
    pub counts: Counts,
}

impl PreparedRun {
    pub fn run_fingerprint(&self) -> &str {
        &self.fingerprints.run
    }

    /// `<run_fingerprint>/<name>`
    pub fn relpath(&self, name: &str) -> String {
        format!("{}/{}", self.fingerprints.run, name)
    }
}

#[derive(Serialize)]
struct AppliedRecord<'a> {
    applied: bool,
    event_id: &'a str,
    event_type: &'a str,
    seq: u64,
    t: i64,
}

pub struct Bridge {
    config: BridgeConfig,
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Normalize, sequence, identify, dedup and fingerprint. Writes nothing.
    ///
    /// Fails with the typed `EventError` (schema, float, seq mismatch) or
    /// `CanonError` (float in the prices manifest) wrapped in `anyhow`.
    pub fn prepare(&self, raw_events: &[Value], prices_manifest: &Value) -> Result<PreparedRun> {
        let ranks = &self.config.type_rank;

        let normalized = normalize_events(raw_events)?;
        let normalized_count = normalized.len() as u64;
        let sequenced = sequence_events(normalized, ranks)?;
        let identified = identify_all(sequenced)?;
        let outcome = dedup_and_order(identified, ranks);
        debug!(
            input = raw_events.len(),
            deduped = outcome.events.len(),
            duplicates_dropped = outcome.duplicates_dropped,
            "canonical event order established"
        );

        let events_jsonl = render_jsonl(&outcome.events)?;
        let fingerprints =
            RunFingerprints::compute(&self.config, &events_jsonl, prices_manifest)?;

        let counts = Counts {
            input: raw_events.len() as u64,
            normalized: normalized_count,
            deduped: outcome.events.len() as u64,
            applied: 0,
            duplicates_dropped: outcome.duplicates_dropped as u64,
        };

        Ok(PreparedRun {
            events: outcome.events,
            events_jsonl,
            fingerprints,
            counts,
        })
    }

    /// Run the whole pipeline against a fresh `engine`.
    ///
    /// Effects, in order: the canonical event log; then, only if every event
    /// applied cleanly, the applied-events log, the final state, the optional
    /// equity curve and last the run manifest. A failure before the log is
    /// written leaves the sink untouched; a ledger failure leaves only the log.
    ///
    /// Ledger artifacts are fully rendered before the first of them is
    /// written. The sink writes one file at a time, so a sink failure part way
    /// through can leave some of them behind; `run_manifest.json` is written
    /// only after all of them and marks a complete run directory.
    pub fn run<E>(
        &self,
        raw_events: &[Value],
        prices_manifest: &Value,
        sink: &dyn ArtifactSink,
        engine: &mut E,
    ) -> Result<BridgeResult>
    where
        E: LedgerEngineLike + ?Sized,
    {
        let prepared = self.prepare(raw_events, prices_manifest)?;
        let run_fp = prepared.run_fingerprint().to_string();
        info!(
            run_fingerprint = %run_fp,
            events = prepared.events.len(),
            "bridge run started"
        );

        let mut manifest = RunManifest::new(&run_fp);
        manifest.write_artifact(
            sink,
            "normalized_beta_events",
            &prepared.relpath(EVENTS_LOG),
            &prepared.events_jsonl,
        )?;

        // Ledger pass: everything stays in memory until the last event applied.
        let every = self.config.snapshot_interval();
        let mut applied_log: Vec<u8> = Vec::new();
        let mut equity_curve: Vec<u8> = Vec::new();
        let mut applied_count: u64 = 0;

        for ev in &prepared.events {
            let outcome = engine.apply(ev).with_context(|| {
                format!(
                    "ledger apply failed at seq={} event_id={} event_type={}",
                    ev.seq,
                    ev.event_id,
                    ev.event_type()
                )
            })?;

            let record = AppliedRecord {
                applied: outcome.applied,
                event_id: &ev.event_id,
                event_type: ev.event_type(),
                seq: ev.seq,
                t: ev.t,
            };
            applied_log.extend(elb_canon::to_canonical_bytes(&record)?);
            applied_log.push(b'\n');

            if outcome.applied {
                applied_count += 1;
                if self.config.emit_equity_curve && applied_count % every == 0 {
                    let state = engine.get_state()?;
                    equity_curve.extend(equity_snapshot(ev.t, &state)?);
                    equity_curve.push(b'\n');
                }
            }
        }

        let final_state = engine.get_state()?;
        let final_state_bytes =
            elb_canon::dumps_canonical(&final_state).context("final ledger state")?;

        let mut staged = vec![
            ("ledger_applied_events", APPLIED_LOG, applied_log),
            ("ledger_final_state", FINAL_STATE, final_state_bytes),
        ];
        if self.config.emit_equity_curve {
            staged.push(("equity_curve", EQUITY_CURVE, equity_curve));
        }
        for (name, file, bytes) in &staged {
            let relpath = prepared.relpath(file);
            if let Err(err) = manifest.write_artifact(sink, name, &relpath, bytes) {
                let written: Vec<&str> =
                    manifest.artifacts.keys().map(String::as_str).collect();
                warn!(
                    run_fingerprint = %run_fp,
                    artifact = *name,
                    ?written,
                    "ledger artifact write failed; run directory has no manifest"
                );
                return Err(err);
            }
        }

        let counts = Counts {
            applied: applied_count,
            ..prepared.counts.clone()
        };
        manifest.counts = counts.as_map();
        manifest.fingerprints = BTreeMap::from([
            ("config".to_string(), prepared.fingerprints.config.clone()),
            ("events".to_string(), prepared.fingerprints.events.clone()),
            ("prices".to_string(), prepared.fingerprints.prices.clone()),
        ]);
        let manifest_relpath = prepared.relpath(RUN_MANIFEST);
        manifest.finish(sink, &manifest_relpath)?;

        let mut artifact_relpaths: BTreeMap<String, String> = manifest
            .artifacts
            .iter()
            .map(|(name, entry)| (name.clone(), entry.relpath.clone()))
            .collect();
        artifact_relpaths.insert("run_manifest".to_string(), manifest_relpath);

        info!(
            run_fingerprint = %run_fp,
            input = counts.input,
            deduped = counts.deduped,
            applied = counts.applied,
            duplicates_dropped = counts.duplicates_dropped,
            "bridge run complete"
        );

        Ok(BridgeResult {
            run_fingerprint: run_fp,
            counts,
            artifact_relpaths,
            fingerprints: prepared.fingerprints,
        })
    }
}

fn equity_snapshot(t: i64, state: &Value) -> Result<Vec<u8>> {
    let mut snap = Map::new();
    snap.insert("t".to_string(), Value::from(t));
    for key in SNAPSHOT_FIELDS {
        snap.insert(
            key.to_string(),
            state.get(key).cloned().unwrap_or(Value::Null),
        );
    }
    elb_canon::dumps_canonical(&Value::Object(snap)).context("equity snapshot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_fills_missing_fields_with_null() {
        let bytes = equity_snapshot(7, &json!({"cash_int": 5, "extra": 1})).unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["t"], json!(7));
        assert_eq!(v["cash_int"], json!(5));
        assert_eq!(v["positions"], Value::Null);
        assert!(v.get("extra").is_none());
    }

    #[test]
    fn prepare_counts_without_applying() {
        let bridge = Bridge::new(BridgeConfig::default());
        let ev = json!({"event_type": "Fee", "t": 1, "payload": {"fee_int": 1}});
        let prepared = bridge.prepare(&[ev.clone(), ev], &json!({})).unwrap();
        assert_eq!(prepared.counts.input, 2);
        assert_eq!(prepared.counts.normalized, 2);
        assert_eq!(prepared.counts.deduped, 1);
        assert_eq!(prepared.counts.duplicates_dropped, 1);
        assert_eq!(prepared.counts.applied, 0);
        assert!(prepared
            .relpath(EVENTS_LOG)
            .starts_with(prepared.run_fingerprint()));
    }
}
