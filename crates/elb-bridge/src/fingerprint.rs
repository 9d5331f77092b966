//! Content addressing for a run.
//!
//! ```text
//! events_fingerprint = sha256(normalized_beta_events.jsonl bytes)
//! prices_fingerprint = sha256(canonical(prices_manifest_or_ref))
//! config_fingerprint = sha256(canonical(bridge_config))
//! run_fingerprint    = sha256(canonical({config_fingerprint,
//!                                        events_fingerprint,
//!                                        prices_fingerprint}))
//! ```
//!
//! The ledger's own parameters are not part of the address: the bridge is
//! engine-agnostic and only hashes what it owns.

use elb_canon::{canonical_sha256_hex, sha256_hex, CanonError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BridgeConfig;

pub fn events_fingerprint(events_jsonl: &[u8]) -> String {
    sha256_hex(events_jsonl)
}

/// The manifest is opaque here; it only has to be float-free.
pub fn prices_fingerprint(prices_manifest: &Value) -> Result<String, CanonError> {
    canonical_sha256_hex(prices_manifest)
}

pub fn config_fingerprint(config: &BridgeConfig) -> Result<String, CanonError> {
    canonical_sha256_hex(config)
}

#[derive(Serialize)]
struct RunAddress<'a> {
    config_fingerprint: &'a str,
    events_fingerprint: &'a str,
    prices_fingerprint: &'a str,
}

pub fn run_fingerprint(config: &str, events: &str, prices: &str) -> Result<String, CanonError> {
    canonical_sha256_hex(&RunAddress {
        config_fingerprint: config,
        events_fingerprint: events,
        prices_fingerprint: prices,
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFingerprints {
    pub config: String,
    pub events: String,
    pub prices: String,
    pub run: String,
}

impl RunFingerprints {
    pub fn compute(
        config: &BridgeConfig,
        events_jsonl: &[u8],
        prices_manifest: &Value,
    ) -> Result<Self, CanonError> {
        let config = config_fingerprint(config)?;
        let events = events_fingerprint(events_jsonl);
        let prices = prices_fingerprint(prices_manifest)?;
        let run = run_fingerprint(&config, &events, &prices)?;
        Ok(Self {
            config,
            events,
            prices,
            run,
        })
    }
}
