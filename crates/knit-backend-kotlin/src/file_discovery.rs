//! Source file discovery for the scanner.

use knit_config::ScannerSettings;
use knit_core::{Error, Result, ScanError};
use knit_fs::{discover_files, DiscoveredFiles, DiscoveryOptions};
use std::path::Path;

/// Configuration for file discovery.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// File extensions to consider as source files
    pub extensions: Vec<String>,

    /// Globs excluded from the walk; nothing else is filtered
    pub ignore_patterns: Vec<String>,

    /// Maximum file size to read (bytes). Larger files are reported as
    /// skipped rather than read.
    pub max_file_size: Option<u64>,

    /// Follow symlinks during traversal
    pub follow_symlinks: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self::from(&ScannerSettings::default())
    }
}

impl From<&ScannerSettings> for DiscoveryConfig {
    fn from(settings: &ScannerSettings) -> Self {
        Self {
            extensions: settings.extensions.clone(),
            ignore_patterns: settings.ignore_patterns.clone(),
            max_file_size: Some(10 * 1024 * 1024), // 10MB
            follow_symlinks: false,
        }
    }
}

/// Discovers all source files under `root`, in sorted path order.
///
/// Hidden files and directories are included and ignore files shipped in the
/// tree are not honoured. Entries that cannot be walked and oversized files
/// come back in [`DiscoveredFiles::skipped`].
///
/// # Security
/// - Does not follow symlinks by default
/// - Refuses to walk the filesystem root or system directories
/// - Has max file size limit to prevent memory exhaustion
pub fn discover_source_files(root: &Path, config: &DiscoveryConfig) -> Result<DiscoveredFiles> {
    validate_project_root(root)?;

    let options = DiscoveryOptions {
        max_file_size: config.max_file_size,
        follow_symlinks: config.follow_symlinks,
    };

    discover_files(root, &config.extensions, &config.ignore_patterns, &options).map_err(|e| {
        Error::Scan(ScanError::Discovery {
            root: root.to_path_buf(),
            message: e.to_string(),
        })
    })
}

/// Validates that the project root is safe to scan.
pub fn validate_project_root(root: &Path) -> Result<()> {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    if root == Path::new("/") {
        return Err(Error::InvalidConfig {
            message: "Refusing to scan filesystem root".to_string(),
        });
    }

    #[cfg(unix)]
    {
        let dangerous_paths = ["/bin", "/sbin", "/usr", "/etc", "/sys", "/proc", "/dev", "/boot"];
        for dangerous in &dangerous_paths {
            if root.starts_with(dangerous) {
                return Err(Error::InvalidConfig {
                    message: format!("Refusing to scan system directory: {}", dangerous),
                });
            }
        }
    }

    #[cfg(windows)]
    {
        let root_str = root.to_string_lossy().to_lowercase();
        if root_str.contains(":\\windows") || root_str.contains(":\\program files") {
            return Err(Error::InvalidConfig {
                message: "Refusing to scan Windows system directory".to_string(),
            });
        }
    }

    Ok(())
}
