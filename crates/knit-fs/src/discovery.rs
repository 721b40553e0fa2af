//! Source file discovery.

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use knit_core::validation::validate_path;
use knit_core::ScanError;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for file discovery.
///
/// The walk never applies `.gitignore`, `.ignore` or hidden-file rules; an
/// uploaded tree is scanned as-is apart from the caller's ignore patterns.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Matching files larger than this are reported, not returned (bytes).
    pub max_file_size: Option<u64>,

    /// Follow symbolic links (default: false for security).
    pub follow_symlinks: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default
            follow_symlinks: false,
        }
    }
}

/// Files found by [`discover_files`], plus the entries that had to be skipped.
#[derive(Debug, Default)]
pub struct DiscoveredFiles {
    /// Matching files in sorted path order.
    pub files: Vec<PathBuf>,

    /// Unreadable entries and oversized files, with paths relative to the root.
    pub skipped: Vec<ScanError>,
}

/// Discovers files under `root` whose extension is in `extensions`.
///
/// Extensions include the dot (e.g. `".kt"`). `ignore_patterns` are globs
/// relative to `root` that exclude matches. Results are sorted so scans
/// are deterministic, and every path is checked to resolve inside `root`.
///
/// An entry that cannot be walked does not stop the walk; it lands in
/// [`DiscoveredFiles::skipped`].
///
/// # Errors
///
/// Fails only when an ignore pattern is not a valid glob.
pub fn discover_files(
    root: &Path,
    extensions: &[String],
    ignore_patterns: &[String],
    options: &DiscoveryOptions,
) -> io::Result<DiscoveredFiles> {
    let mut discovered = BTreeSet::new();
    let mut skipped = Vec::new();

    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name(|a, b| a.cmp(b));

    if !ignore_patterns.is_empty() {
        let mut overrides = OverrideBuilder::new(root);
        for pattern in ignore_patterns {
            overrides
                .add(&format!("!{}", pattern))
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        }
        let built = overrides
            .build()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        walker.overrides(built);
    }

    for result in walker.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                let (path, message) = describe_walk_error(&err);
                let path = path.map_or_else(|| PathBuf::from("."), |p| relative_to(root, p));
                debug!(path = %path.display(), error = %message, "skipping unwalkable entry");
                skipped.push(ScanError::Walk { path, message });
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let matches_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|wanted| wanted.strip_prefix('.') == Some(ext)));
        if !matches_extension {
            continue;
        }

        if let Some(limit) = options.max_file_size {
            match entry.metadata() {
                Ok(meta) if meta.len() > limit => {
                    skipped.push(ScanError::TooLarge {
                        path: relative_to(root, path),
                        size: meta.len(),
                        limit,
                    });
                    continue;
                }
                Ok(_) => {}
                Err(err) => {
                    skipped.push(ScanError::Walk {
                        path: relative_to(root, path),
                        message: err.to_string(),
                    });
                    continue;
                }
            }
        }

        // Ensure it's within project root (security)
        if validate_path(path, root).is_ok() {
            discovered.insert(path.to_path_buf());
        }
    }

    Ok(DiscoveredFiles {
        files: discovered.into_iter().collect(),
        skipped,
    })
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Splits a walker error into the path it concerns and the underlying cause.
fn describe_walk_error(err: &ignore::Error) -> (Option<&Path>, String) {
    match err {
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            describe_walk_error(err)
        }
        ignore::Error::WithPath { path, err } => (Some(path.as_path()), err.to_string()),
        ignore::Error::Loop { child, .. } => (Some(child.as_path()), err.to_string()),
        other => (None, other.to_string()),
    }
}
