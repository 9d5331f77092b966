use anyhow::Result;
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::relpath::validate_relpath;
use crate::ArtifactSink;

/// In-memory sink for tests and dry runs. Keys are the relpaths as written.
#[derive(Debug, Default)]
pub struct MemoryArtifactSink {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemoryArtifactSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, relpath: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(relpath).cloned()
    }

    /// Written relpaths, sorted.
    pub fn list(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<u8>> {
        self.files.into_inner()
    }
}

impl ArtifactSink for MemoryArtifactSink {
    fn write_bytes(&self, relpath: &str, data: &[u8]) -> Result<()> {
        validate_relpath(relpath)?;
        self.files
            .borrow_mut()
            .insert(relpath.to_string(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_replaces_content() {
        let sink = MemoryArtifactSink::new();
        sink.write_bytes("r/a.json", b"1").unwrap();
        sink.write_bytes("r/a.json", b"2").unwrap();
        assert_eq!(sink.get("r/a.json").unwrap(), b"2");
        assert_eq!(sink.list(), vec!["r/a.json"]);
    }

    #[test]
    fn rejects_escaping_path() {
        let sink = MemoryArtifactSink::new();
        assert!(sink.write_bytes("../a", b"x").is_err());
        assert!(sink.is_empty());
    }
}
