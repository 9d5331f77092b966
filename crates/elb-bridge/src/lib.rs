//! Deterministic event-to-ledger bridge.
//!
//! Pipeline:
//!
//! ```text
//! raw events -> normalize -> sequence -> identify -> dedup/order
//!            -> canonical log -> run fingerprint -> ledger apply -> artifacts
//! ```
//!
//! Every artifact is a function of (events, prices manifest, bridge config)
//! only and lands under `<run_fingerprint>/` in the sink.

mod bridge;
mod config;
mod fingerprint;
mod result;

pub use bridge::{artifact_names, Bridge, PreparedRun};
pub use config::BridgeConfig;
pub use fingerprint::{
    config_fingerprint, events_fingerprint, prices_fingerprint, run_fingerprint, RunFingerprints,
};
pub use result::{BridgeResult, Counts};
