//! Line-level marker scanner.
//!
//! No parsing happens here. A file is read line by line and two textual
//! heuristics are applied:
//!
//! - a line with both the provider marker and the declaration token names the
//!   file's component (the last such line wins)
//! - a line with the injection marker contributes one dependency, the token
//!   right after the binding keyword
//!
//! Dependencies found in a file that names no component are dropped.

use knit_config::ScannerSettings;
use knit_core::{ExtractedComponent, ScanError};
use std::fs;
use std::path::Path;

/// The four textual markers the scanner matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub provider_marker: String,
    pub declaration_token: String,
    pub injection_marker: String,
    pub binding_keyword: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self::from(&ScannerSettings::default())
    }
}

impl From<&ScannerSettings> for Markers {
    fn from(settings: &ScannerSettings) -> Self {
        Self {
            provider_marker: settings.provider_marker.clone(),
            declaration_token: settings.declaration_token.clone(),
            injection_marker: settings.injection_marker.clone(),
            binding_keyword: settings.binding_keyword.clone(),
        }
    }
}

impl Markers {
    /// Component name declared on `line`, if it is a provider line.
    ///
    /// The name runs from the declaration token to the next `(` or the end
    /// of the line. Blank names count as no declaration.
    fn declared_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        if !line.contains(&self.provider_marker) {
            return None;
        }
        let start = line.find(&self.declaration_token)? + self.declaration_token.len();
        let rest = &line[start..];
        let name = rest.find('(').map_or(rest, |end| &rest[..end]).trim();
        (!name.is_empty()).then_some(name)
    }

    /// Dependency injected on `line`, if it is an injection line.
    fn injected_dependency<'a>(&self, line: &'a str) -> Option<&'a str> {
        if !line.contains(&self.injection_marker) {
            return None;
        }
        let mut segments = line.split(self.binding_keyword.as_str());
        segments.next();
        let token = segments.next()?.split(' ').next()?.trim();
        (!token.is_empty()).then_some(token)
    }
}

/// Extracts at most one component from the text of a single file.
pub fn scan_source(contents: &str, markers: &Markers) -> Option<ExtractedComponent> {
    let mut name = None;
    let mut dependencies = Vec::new();

    for line in contents.lines() {
        if let Some(declared) = markers.declared_name(line) {
            name = Some(declared);
        }
        if let Some(dependency) = markers.injected_dependency(line) {
            dependencies.push(dependency);
        }
    }

    name.map(|name| ExtractedComponent::new(name).with_dependencies(dependencies))
}

/// Reads and scans one file.
///
/// Errors carry `path` relative to `root` so they read the same whichever
/// directory the tree was unpacked into.
pub fn scan_file(
    root: &Path,
    path: &Path,
    markers: &Markers,
) -> Result<Option<ExtractedComponent>, ScanError> {
    let contents = fs::read_to_string(path).map_err(|source| ScanError::Read {
        path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
        source,
    })?;
    Ok(scan_source(&contents, markers))
}
