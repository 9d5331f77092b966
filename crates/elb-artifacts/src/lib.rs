//! Artifact persistence for bridge runs.
//!
//! Every artifact is addressed by a relative path under a sink root. The
//! filesystem sink replaces targets atomically (write `<target>.tmp`, fsync,
//! rename), so a reader never observes a half-written file.

mod fs_sink;
mod manifest;
mod memory;
mod relpath;

pub use fs_sink::FsArtifactSink;
pub use manifest::{ArtifactEntry, RunManifest, MANIFEST_SCHEMA_VERSION};
pub use memory::MemoryArtifactSink;
pub use relpath::{validate_relpath, InvalidRelpath};

/// Where run artifacts go.
///
/// Writes to the same `relpath` replace the previous content.
pub trait ArtifactSink {
    fn write_bytes(&self, relpath: &str, data: &[u8]) -> anyhow::Result<()>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &S {
    fn write_bytes(&self, relpath: &str, data: &[u8]) -> anyhow::Result<()> {
        (**self).write_bytes(relpath, data)
    }
}
