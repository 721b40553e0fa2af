//! Request-scoped working directory.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

const WORKSPACE_PREFIX: &str = "knit_project";

/// A temporary directory owned by exactly one analysis.
///
/// The directory and everything in it is removed when the `Workspace` is
/// dropped, whichever way the analysis ends (including unwinding).
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a workspace under the system temp directory.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()?;
        debug!(path = %dir.path().display(), "created workspace");
        Ok(Self { dir })
    }

    /// Creates a workspace under `parent`.
    pub fn new_in(parent: impl AsRef<Path>) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)?;
        debug!(path = %dir.path().display(), "created workspace");
        Ok(Self { dir })
    }

    /// Root of the workspace.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the workspace now, reporting removal errors instead of
    /// swallowing them like `Drop` does.
    pub fn close(self) -> io::Result<()> {
        let path: PathBuf = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!(path = %path.display(), "removed workspace");
        Ok(())
    }
}
