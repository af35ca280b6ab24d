use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Resolve a path against the current directory.
///
/// Existing paths are canonicalized so that symlinked spellings of the same
/// file compare equal; paths that no longer exist are joined onto `base` and
/// lexically normalized instead.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    std::fs::canonicalize(&joined).unwrap_or_else(|_| normalize(&joined))
}

/// Remove `.` and `..` components without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Check whether any segment of `path` is exactly `segment`
pub fn has_segment(path: &Path, segment: &str) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == OsStr::new(segment)))
}

/// Final path component as UTF-8, if it has one
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}
