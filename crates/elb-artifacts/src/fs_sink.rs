use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::relpath::validate_relpath;
use crate::ArtifactSink;

/// Filesystem sink rooted at a directory (created on first write).
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    root: PathBuf,
}

impl FsArtifactSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `relpath` under the root.
    pub fn resolve(&self, relpath: &str) -> Result<PathBuf> {
        Ok(self.root.join(validate_relpath(relpath)?))
    }
}

impl ArtifactSink for FsArtifactSink {
    fn write_bytes(&self, relpath: &str, data: &[u8]) -> Result<()> {
        let target = self.resolve(relpath)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create artifact dir failed: {}", parent.display()))?;
        }

        let tmp = tmp_path(&target);
        if let Err(e) = write_synced(&tmp, data) {
            // leave no partial temp file behind
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &target).with_context(|| {
            format!(
                "rename artifact failed: {} -> {}",
                tmp.display(),
                target.display()
            )
        })?;

        debug!(relpath, bytes = data.len(), "artifact written");
        Ok(())
    }
}

fn tmp_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    target.with_file_name(name)
}

fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
    let mut f =
        File::create(path).with_context(|| format!("create temp failed: {}", path.display()))?;
    f.write_all(data)
        .with_context(|| format!("write temp failed: {}", path.display()))?;
    f.sync_all()
        .with_context(|| format!("fsync temp failed: {}", path.display()))?;
    Ok(())
}
