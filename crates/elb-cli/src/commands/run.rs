//! `elb run` and `elb fingerprint`.

use anyhow::{Context, Result};
use elb_artifacts::FsArtifactSink;
use elb_bridge::Bridge;
use elb_ledger::LedgerEngine;
use tracing::info;

use super::{load_events, load_prices, load_settings};
use crate::RunInputs;

pub fn run_bridge(inputs: &RunInputs, out: Option<String>) -> Result<()> {
    let loaded = load_settings(inputs)?;
    let events = load_events(&inputs.events)?;
    let prices = load_prices(inputs)?;

    let out_dir = out.unwrap_or_else(|| loaded.settings.output.out_dir.clone());
    info!(config_hash = %loaded.config_hash, out_dir = %out_dir, "settings loaded");

    let sink = FsArtifactSink::new(&out_dir);
    let mut engine =
        LedgerEngine::new(&loaded.settings.ledger).context("invalid ledger settings")?;
    let bridge = Bridge::new(loaded.settings.bridge.clone());
    let res = bridge.run(&events, &prices, &sink, &mut engine)?;

    println!("run_fingerprint={}", res.run_fingerprint);
    println!("out_dir={}", sink.root().join(&res.run_fingerprint).display());
    println!(
        "counts input={} normalized={} deduped={} applied={} duplicates_dropped={}",
        res.counts.input,
        res.counts.normalized,
        res.counts.deduped,
        res.counts.applied,
        res.counts.duplicates_dropped
    );
    for (name, relpath) in &res.artifact_relpaths {
        println!("artifact {}={}", name, relpath);
    }
    Ok(())
}

pub fn fingerprint(inputs: &RunInputs) -> Result<()> {
    let loaded = load_settings(inputs)?;
    let events = load_events(&inputs.events)?;
    let prices = load_prices(inputs)?;

    let prepared = Bridge::new(loaded.settings.bridge.clone()).prepare(&events, &prices)?;
    let fp = &prepared.fingerprints;

    println!("run_fingerprint={}", fp.run);
    println!("events_fingerprint={}", fp.events);
    println!("prices_fingerprint={}", fp.prices);
    println!("config_fingerprint={}", fp.config);
    println!(
        "counts input={} normalized={} deduped={} duplicates_dropped={}",
        prepared.counts.input,
        prepared.counts.normalized,
        prepared.counts.deduped,
        prepared.counts.duplicates_dropped
    );
    Ok(())
}
