//! Scenario: floats anywhere in the inputs abort the run before any write
//!
//! GREEN when:
//! - a float nested deep in a payload fails with `EventError::FloatForbidden`
//!   carrying its JSON path and the offending input index.
//! - a float in the prices manifest fails with `CanonError::FloatForbidden`.
//! - in both cases the sink is left empty and the engine untouched.

use elb_artifacts::MemoryArtifactSink;
use elb_bridge::{Bridge, BridgeConfig};
use elb_canon::CanonError;
use elb_events::EventError;
use elb_ledger::{LedgerConfig, LedgerEngine};
use serde_json::json;

#[test]
fn nested_payload_float_is_located() {
    let raw = vec![
        json!({"event_type": "Price", "t": 1, "payload": {"symbol": "X", "price_int": 1}}),
        json!({"event_type": "Adjustment", "t": 2, "payload": {"a": [0, {"b": 0.5}]}}),
    ];
    let sink = MemoryArtifactSink::new();
    let mut engine = LedgerEngine::new(&LedgerConfig::default()).unwrap();
    let before = engine.state().clone();

    let err = Bridge::new(BridgeConfig::default())
        .run(&raw, &json!({}), &sink, &mut engine)
        .unwrap_err();

    match err.downcast_ref::<EventError>() {
        Some(EventError::FloatForbidden { index, path }) => {
            assert_eq!(*index, Some(1));
            assert_eq!(path, "$.payload.a[1].b");
        }
        other => panic!("expected FloatForbidden, got {other:?} ({err:#})"),
    }
    assert!(sink.is_empty());
    assert_eq!(engine.state(), &before);
}

#[test]
fn float_logical_time_is_forbidden() {
    let raw = vec![json!({"event_type": "Price", "t": 1.0, "payload": {}})];
    let sink = MemoryArtifactSink::new();
    let mut engine = LedgerEngine::new(&LedgerConfig::default()).unwrap();

    let err = Bridge::new(BridgeConfig::default())
        .run(&raw, &json!({}), &sink, &mut engine)
        .unwrap_err();
    assert!(err
        .downcast_ref::<EventError>()
        .map(EventError::is_float_forbidden)
        .unwrap_or(false));
    assert!(sink.is_empty());
}

#[test]
fn float_in_prices_manifest_is_forbidden() {
    let raw = vec![json!({"event_type": "Price", "t": 1, "payload": {"symbol": "X", "price_int": 1}})];
    let sink = MemoryArtifactSink::new();
    let mut engine = LedgerEngine::new(&LedgerConfig::default()).unwrap();

    let err = Bridge::new(BridgeConfig::default())
        .run(&raw, &json!({"close": [1, 2.25]}), &sink, &mut engine)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CanonError>(),
        Some(CanonError::FloatForbidden { .. })
    ));
    assert!(sink.is_empty());
}

#[test]
fn schema_error_writes_nothing() {
    let raw = vec![json!({"t": 1, "payload": {}})];
    let sink = MemoryArtifactSink::new();
    let mut engine = LedgerEngine::new(&LedgerConfig::default()).unwrap();

    let err = Bridge::new(BridgeConfig::default())
        .run(&raw, &json!({}), &sink, &mut engine)
        .unwrap_err();
    assert!(err
        .downcast_ref::<EventError>()
        .map(EventError::is_schema)
        .unwrap_or(false));
    assert!(sink.is_empty());
}
