//! Scenario: filesystem sink writes atomically under its root
//!
//! GREEN when:
//! - nested parents are created and content lands at `<root>/<relpath>`.
//! - rewriting a relpath replaces the content.
//! - no `*.tmp` file survives a write.
//! - absolute and `..` relpaths are refused before touching the disk.

use elb_artifacts::{ArtifactSink, FsArtifactSink, InvalidRelpath, RunManifest};
use std::fs;
use std::path::Path;

fn tmp_files(dir: &Path) -> Vec<String> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            out.extend(tmp_files(&path));
        } else if path.extension().map(|e| e == "tmp").unwrap_or(false) {
            out.push(path.display().to_string());
        }
    }
    out
}

#[test]
fn nested_write_and_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsArtifactSink::new(dir.path().join("out"));

    sink.write_bytes("run1/normalized_beta_events.jsonl", b"a\n")
        .unwrap();
    sink.write_bytes("run1/normalized_beta_events.jsonl", b"b\n")
        .unwrap();

    let target = dir.path().join("out/run1/normalized_beta_events.jsonl");
    assert_eq!(fs::read(&target).unwrap(), b"b\n");
    assert!(tmp_files(dir.path()).is_empty());
}

#[test]
fn escaping_relpaths_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsArtifactSink::new(dir.path().join("out"));

    for bad in ["../escape.json", "/abs.json", "a/../../b.json"] {
        let err = sink.write_bytes(bad, b"x").unwrap_err();
        assert!(
            err.downcast_ref::<InvalidRelpath>().is_some(),
            "{bad}: unexpected error {err:#}"
        );
    }
    assert!(!dir.path().join("out").exists());
    assert!(!dir.path().join("escape.json").exists());
}

#[test]
fn manifest_lists_written_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsArtifactSink::new(dir.path());

    let mut manifest = RunManifest::new("run1");
    manifest
        .write_artifact(&sink, "ledger_final_state", "run1/ledger_final_state.json", b"{}")
        .unwrap();
    manifest.finish(&sink, "run1/run_manifest.json").unwrap();

    let raw = fs::read(dir.path().join("run1/run_manifest.json")).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(
        v["artifacts"]["ledger_final_state"]["relpath"],
        "run1/ledger_final_state.json"
    );
    assert_eq!(v["run_fingerprint"], "run1");
    assert!(tmp_files(dir.path()).is_empty());
}
