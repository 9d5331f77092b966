use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A relative artifact path that would escape the sink root (or names nothing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRelpath {
    pub relpath: String,
    pub reason: &'static str,
}

impl fmt::Display for InvalidRelpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid artifact relpath {:?}: {}", self.relpath, self.reason)
    }
}

impl std::error::Error for InvalidRelpath {}

/// Check that `relpath` stays under the sink root and return it as a path.
///
/// Rejected: empty paths, absolute paths (including a Windows prefix) and any
/// `..` component. `.` components are dropped.
pub fn validate_relpath(relpath: &str) -> Result<PathBuf, InvalidRelpath> {
    let bad = |reason| InvalidRelpath {
        relpath: relpath.to_string(),
        reason,
    };

    if relpath.starts_with('/') || relpath.starts_with('\\') {
        return Err(bad("absolute paths are not allowed"));
    }

    let mut out = PathBuf::new();
    for comp in Path::new(relpath).components() {
        match comp {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => return Err(bad("'..' components are not allowed")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(bad("absolute paths are not allowed"))
            }
        }
    }

    if out.as_os_str().is_empty() {
        return Err(bad("path names no file"));
    }
    Ok(out)
}
