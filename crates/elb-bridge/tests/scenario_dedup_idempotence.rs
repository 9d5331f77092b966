//! Scenario: a logical event fed twice is applied once
//!
//! GREEN when:
//! - duplicating a Fill in the input yields `duplicates_dropped == 1`.
//! - the ledger final state matches the run without the duplicate.
//! - the whole artifact set (and thus the run fingerprint) is unchanged.

use elb_artifacts::MemoryArtifactSink;
use elb_bridge::{Bridge, BridgeConfig, BridgeResult};
use elb_ledger::{LedgerConfig, LedgerEngine};
use serde_json::{json, Value};

fn fill() -> Value {
    json!({"event_type": "Fill", "t": 1, "payload": {"side": "BUY", "symbol": "X", "qty_int": 10, "price_int": 20000}})
}

fn run(raw: &[Value]) -> (BridgeResult, MemoryArtifactSink) {
    let sink = MemoryArtifactSink::new();
    let mut engine = LedgerEngine::new(&LedgerConfig {
        initial_cash_int: 1_000_000,
        ..LedgerConfig::default()
    })
    .unwrap();
    let res = Bridge::new(BridgeConfig::default())
        .run(raw, &json!({}), &sink, &mut engine)
        .unwrap();
    assert_eq!(engine.state().qty_int("X"), 10);
    (res, sink)
}

#[test]
fn duplicate_fill_is_dropped_once() {
    let price = json!({"event_type": "Price", "t": 1, "payload": {"symbol": "X", "price_int": 20000}});

    let (once, once_sink) = run(&[price.clone(), fill()]);
    let (twice, twice_sink) = run(&[fill(), price, fill()]);

    assert_eq!(once.counts.duplicates_dropped, 0);
    assert_eq!(twice.counts.duplicates_dropped, 1);
    assert_eq!(twice.counts.input, 3);
    assert_eq!(twice.counts.deduped, 2);
    assert_eq!(twice.counts.applied, once.counts.applied);

    assert_eq!(once.run_fingerprint, twice.run_fingerprint);
    let final_state = format!("{}/ledger_final_state.json", once.run_fingerprint);
    assert_eq!(once_sink.get(&final_state), twice_sink.get(&final_state));
    assert_eq!(once_sink.list(), twice_sink.list());
}

#[test]
fn caller_seq_consistent_with_duplicate_is_accepted() {
    let mut with_seq = fill();
    with_seq["seq"] = json!(0);

    let (res, _) = run(&[with_seq, fill()]);
    assert_eq!(res.counts.duplicates_dropped, 1);
}

#[test]
fn differing_source_is_not_a_duplicate() {
    let mut other = fill();
    other["source"] = json!("replay");
    other["payload"]["qty_int"] = json!(0);

    let (res, _) = run(&[fill(), other]);
    assert_eq!(res.counts.duplicates_dropped, 0);
    assert_eq!(res.counts.deduped, 2);
}
