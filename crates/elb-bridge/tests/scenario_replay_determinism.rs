//! Scenario: repeated runs over the same logical inputs are byte-identical
//!
//! GREEN when:
//! - two runs against fresh engines and fresh output roots produce the same
//!   run fingerprint and byte-identical artifact trees.
//! - permuting the input array leaves `normalized_beta_events.jsonl` and every
//!   other artifact unchanged.

use elb_artifacts::FsArtifactSink;
use elb_bridge::{Bridge, BridgeConfig, BridgeResult};
use elb_ledger::{LedgerConfig, LedgerEngine};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn events() -> Vec<Value> {
    vec![
        json!({"event_type": "Price", "t": 1, "payload": {"symbol": "X", "price_int": 10000}}),
        json!({"event_type": "Fill", "t": 2, "payload": {"side": "BUY", "symbol": "X", "qty_int": 100, "price_int": 10000}}),
        json!({"event_type": "Fee", "t": 2, "payload": {"fee_int": 250, "symbol": "X"}}),
        json!({"event_type": "OrderIntent", "t": 2, "source": "strategy", "payload": {"symbol": "X", "qty_int": 100}}),
        json!({"event_type": "Price", "ts_sim": 3, "payload": {"symbol": "X", "price_int": 10500}}),
        json!({"event_type": "Fill", "t": 4, "payload": {"side": "SELL", "symbol": "X", "qty_int": 40, "price_int": 10600}}),
        json!({"event_type": "SnapshotMarker", "idx": 5}),
    ]
}

fn prices() -> Value {
    json!({"source": "bars_v1", "symbols": ["X"], "rows": 3})
}

fn config() -> BridgeConfig {
    BridgeConfig {
        emit_equity_curve: true,
        equity_snapshot_every_n_events: Some(2),
        ..BridgeConfig::default()
    }
}

fn run_into(root: &Path, raw: &[Value]) -> BridgeResult {
    let sink = FsArtifactSink::new(root);
    let mut engine = LedgerEngine::new(&LedgerConfig {
        initial_cash_int: 10_000_000,
        ..LedgerConfig::default()
    })
    .unwrap();
    Bridge::new(config())
        .run(raw, &prices(), &sink, &mut engine)
        .unwrap()
}

fn read_tree(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut out = BTreeMap::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        out.insert(name, fs::read(&path).unwrap());
    }
    out
}

#[test]
fn two_runs_are_byte_identical() {
    let a_dir = tempfile::tempdir().unwrap();
    let b_dir = tempfile::tempdir().unwrap();

    let a = run_into(a_dir.path(), &events());
    let b = run_into(b_dir.path(), &events());

    assert_eq!(a.run_fingerprint, b.run_fingerprint);
    assert_eq!(a, b);

    let a_tree = read_tree(&a_dir.path().join(&a.run_fingerprint));
    let b_tree = read_tree(&b_dir.path().join(&b.run_fingerprint));
    assert_eq!(
        a_tree.keys().cloned().collect::<Vec<_>>(),
        vec![
            "equity_curve.jsonl",
            "ledger_applied_events.jsonl",
            "ledger_final_state.json",
            "normalized_beta_events.jsonl",
            "run_manifest.json",
        ]
    );
    assert_eq!(a_tree, b_tree);
}

#[test]
fn shuffled_input_produces_same_artifacts() {
    let base_dir = tempfile::tempdir().unwrap();
    let base = run_into(base_dir.path(), &events());
    let base_tree = read_tree(&base_dir.path().join(&base.run_fingerprint));

    let mut reversed = events();
    reversed.reverse();
    let mut rotated = events();
    rotated.rotate_left(3);

    for shuffled in [reversed, rotated] {
        let dir = tempfile::tempdir().unwrap();
        let res = run_into(dir.path(), &shuffled);
        assert_eq!(res.run_fingerprint, base.run_fingerprint);
        assert_eq!(read_tree(&dir.path().join(&res.run_fingerprint)), base_tree);
    }
}

#[test]
fn counts_and_relpaths_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let res = run_into(dir.path(), &events());

    assert_eq!(res.counts.input, 7);
    assert_eq!(res.counts.normalized, 7);
    assert_eq!(res.counts.deduped, 7);
    assert_eq!(res.counts.duplicates_dropped, 0);
    // Price, Fill, Fee, Price, Fill mutate; OrderIntent and SnapshotMarker do not
    assert_eq!(res.counts.applied, 5);

    for relpath in res.artifact_relpaths.values() {
        assert!(relpath.starts_with(&format!("{}/", res.run_fingerprint)));
        assert!(dir.path().join(relpath).is_file(), "{relpath} missing");
    }
    assert_eq!(res.artifact_relpaths.len(), 5);
}
