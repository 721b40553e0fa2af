//! Zip archive extraction.
//!
//! Extraction runs in two passes. The first pass reads only the central
//! directory: every entry name is resolved against the target directory and
//! the declared sizes are checked against [`ExtractionLimits`]. Nothing is
//! written unless the whole archive passes. The second pass decompresses,
//! re-checking sizes against the bytes actually produced.

use knit_core::validation::resolve_entry_path;
use knit_core::ExtractionError;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// Upper bounds on what one upload may expand to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionLimits {
    /// Maximum number of entries (files and directories).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum uncompressed size of a single entry in bytes.
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: u64,

    /// Maximum uncompressed size of the whole archive in bytes.
    #[serde(default = "default_max_total_bytes")]
    pub max_total_bytes: u64,
}

fn default_max_entries() -> usize {
    10_000
}

fn default_max_entry_bytes() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_max_total_bytes() -> u64 {
    200 * 1024 * 1024 // 200MB
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_entry_bytes: default_max_entry_bytes(),
            max_total_bytes: default_max_total_bytes(),
        }
    }
}

/// What an extraction wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

struct PlannedEntry {
    index: usize,
    path: PathBuf,
    is_dir: bool,
}

/// Extracts an in-memory zip archive into `target`.
pub fn extract_archive(
    bytes: &[u8],
    target: &Path,
    limits: &ExtractionLimits,
) -> Result<ExtractionSummary, ExtractionError> {
    extract_reader(Cursor::new(bytes), target, limits)
}

/// Extracts a zip archive from any seekable reader into `target`.
///
/// # Errors
///
/// - `InvalidArchive` if the stream is not a zip archive or an entry is corrupt
/// - `PathTraversal` if any entry would land outside `target`
/// - `TooManyEntries`, `EntryTooLarge`, `ArchiveTooLarge` when a limit is hit
/// - `Io` when writing to disk fails
pub fn extract_reader<R: Read + Seek>(
    reader: R,
    target: &Path,
    limits: &ExtractionLimits,
) -> Result<ExtractionSummary, ExtractionError> {
    let mut archive = ZipArchive::new(reader).map_err(invalid)?;

    if archive.len() > limits.max_entries {
        return Err(ExtractionError::TooManyEntries {
            max_allowed: limits.max_entries,
        });
    }

    let plan = plan_entries(&mut archive, target, limits)?;

    let mut summary = ExtractionSummary::default();
    for planned in plan {
        if planned.is_dir {
            fs::create_dir_all(&planned.path)
                .map_err(|e| ExtractionError::io(&planned.path, e))?;
            summary.directories += 1;
            continue;
        }

        let mut entry = archive.by_index(planned.index).map_err(invalid)?;
        let name = entry.name().to_string();
        if let Some(parent) = planned.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ExtractionError::io(parent, e))?;
        }
        let mut file =
            File::create(&planned.path).map_err(|e| ExtractionError::io(&planned.path, e))?;

        // Declared sizes can lie; bound what is actually decompressed.
        let written = io::copy(&mut entry.by_ref().take(limits.max_entry_bytes + 1), &mut file)
            .map_err(|e| ExtractionError::io(&planned.path, e))?;
        if written > limits.max_entry_bytes {
            return Err(ExtractionError::EntryTooLarge {
                entry: name,
                size: written,
                max_allowed: limits.max_entry_bytes,
            });
        }

        summary.bytes += written;
        if summary.bytes > limits.max_total_bytes {
            return Err(ExtractionError::ArchiveTooLarge {
                max_allowed: limits.max_total_bytes,
            });
        }
        summary.files += 1;
    }

    debug!(
        files = summary.files,
        directories = summary.directories,
        bytes = summary.bytes,
        "archive extracted"
    );
    Ok(summary)
}

fn plan_entries<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    target: &Path,
    limits: &ExtractionLimits,
) -> Result<Vec<PlannedEntry>, ExtractionError> {
    let mut plan = Vec::with_capacity(archive.len());
    let mut declared_total: u64 = 0;

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(invalid)?;
        let name = entry.name().to_string();
        let path = resolve_entry_path(target, &name)?;

        // "./" and friends resolve to the target itself.
        if path.as_path() == target {
            continue;
        }

        if entry.size() > limits.max_entry_bytes {
            return Err(ExtractionError::EntryTooLarge {
                entry: name,
                size: entry.size(),
                max_allowed: limits.max_entry_bytes,
            });
        }
        declared_total = declared_total.saturating_add(entry.size());
        if declared_total > limits.max_total_bytes {
            return Err(ExtractionError::ArchiveTooLarge {
                max_allowed: limits.max_total_bytes,
            });
        }

        plan.push(PlannedEntry {
            index,
            path,
            is_dir: entry.is_dir(),
        });
    }
    Ok(plan)
}

fn invalid(err: zip::result::ZipError) -> ExtractionError {
    ExtractionError::InvalidArchive(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extracts_nested_tree() {
        let target = TempDir::new().unwrap();
        let bytes = zip_of(&[
            ("app/", ""),
            ("app/src/Foo.kt", "@Provides class Foo"),
            ("README.md", "hi"),
        ]);

        let summary = extract_archive(&bytes, target.path(), &ExtractionLimits::default()).unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.directories, 1);
        assert_eq!(
            fs::read_to_string(target.path().join("app/src/Foo.kt")).unwrap(),
            "@Provides class Foo"
        );
        assert_eq!(fs::read_to_string(target.path().join("README.md")).unwrap(), "hi");
    }

    #[test]
    fn test_later_entry_overwrites_earlier() {
        let target = TempDir::new().unwrap();
        let bytes = zip_of(&[("Foo.kt", "first"), ("./Foo.kt", "second")]);

        extract_archive(&bytes, target.path(), &ExtractionLimits::default()).unwrap();

        assert_eq!(fs::read_to_string(target.path().join("Foo.kt")).unwrap(), "second");
    }

    #[test]
    fn test_traversal_rejected_before_anything_is_written() {
        let outer = TempDir::new().unwrap();
        let target = outer.path().join("work");
        fs::create_dir(&target).unwrap();
        let bytes = zip_of(&[("ok/Foo.kt", "fine"), ("../escaped.kt", "evil")]);

        let err = extract_archive(&bytes, &target, &ExtractionLimits::default()).unwrap_err();

        assert!(matches!(err, ExtractionError::PathTraversal { .. }));
        assert!(!outer.path().join("escaped.kt").exists());
        assert!(!target.join("ok/Foo.kt").exists());
    }

    #[test]
    fn test_not_a_zip() {
        let target = TempDir::new().unwrap();
        let err = extract_archive(b"definitely not a zip", target.path(), &ExtractionLimits::default())
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidArchive(_)));
    }

    #[test]
    fn test_entry_limit() {
        let target = TempDir::new().unwrap();
        let bytes = zip_of(&[("a.kt", "a"), ("b.kt", "b"), ("c.kt", "c")]);
        let limits = ExtractionLimits {
            max_entries: 2,
            ..Default::default()
        };

        let err = extract_archive(&bytes, target.path(), &limits).unwrap_err();
        assert!(matches!(err, ExtractionError::TooManyEntries { max_allowed: 2 }));
    }

    #[test]
    fn test_size_limits() {
        let target = TempDir::new().unwrap();
        let bytes = zip_of(&[("a.kt", "0123456789"), ("b.kt", "0123456789")]);

        let per_entry = ExtractionLimits {
            max_entry_bytes: 5,
            ..Default::default()
        };
        assert!(matches!(
            extract_archive(&bytes, target.path(), &per_entry).unwrap_err(),
            ExtractionError::EntryTooLarge { .. }
        ));

        let total = ExtractionLimits {
            max_total_bytes: 15,
            ..Default::default()
        };
        assert!(matches!(
            extract_archive(&bytes, target.path(), &total).unwrap_err(),
            ExtractionError::ArchiveTooLarge { max_allowed: 15 }
        ));
    }
}
