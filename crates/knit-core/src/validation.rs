//! Input validation and security checks.

use crate::error::{Error, ExtractionError, Result};
use std::path::{Component, Path, PathBuf};

/// Validates that path is within project root (prevents path traversal)
pub fn validate_path(path: &Path, project_root: &Path) -> Result<()> {
    let canonical_path = path.canonicalize().map_err(|e| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: format!("Cannot canonicalize: {}", e),
    })?;

    let canonical_root = project_root.canonicalize().map_err(|e| Error::InvalidPath {
        path: project_root.to_path_buf(),
        reason: format!("Cannot canonicalize project root: {}", e),
    })?;

    if !canonical_path.starts_with(&canonical_root) {
        return Err(Error::PathTraversal {
            attempted_path: path.to_path_buf(),
            project_root: project_root.to_path_buf(),
        });
    }

    Ok(())
}

/// Resolves an archive entry name against `root` without touching the disk.
///
/// Both `/` and `\` separate components. `.` is dropped and `..` pops one
/// level; popping past `root`, an absolute name, or a drive prefix is a
/// traversal attempt.
pub fn resolve_entry_path(root: &Path, entry_name: &str) -> std::result::Result<PathBuf, ExtractionError> {
    let traversal = || ExtractionError::PathTraversal {
        entry: entry_name.to_string(),
        root: root.to_path_buf(),
    };

    let normalized = entry_name.replace('\\', "/");
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return Err(traversal()),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(traversal());
                }
            }
            Component::Normal(name) => parts.push(name),
        }
    }

    let mut resolved = root.to_path_buf();
    resolved.extend(parts);
    Ok(resolved)
}
