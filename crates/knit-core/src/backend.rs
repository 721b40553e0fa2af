//! Language backend trait.

use crate::error::{Error, Result};
use crate::types::{AnalysisOptions, AnalysisResult, ExtractedComponent};
use std::fmt;

/// Trait for language-specific analysis backends.
///
/// Backends are responsible for:
/// - Deciding which files to look at
/// - Extracting components and their injected dependencies from source text
/// - Running the graph pipeline over the extracted components
///
/// # Thread Safety
///
/// Implementations must be Send + Sync to allow concurrent requests.
///
/// # Examples
///
/// ```no_run
/// use knit_core::{AnalysisOptions, LanguageBackend};
///
/// fn analyze_with_backend(backend: &dyn LanguageBackend, options: AnalysisOptions) {
///     println!("Using {} backend", backend.name());
///
///     match backend.analyze(options) {
///         Ok(result) => println!("Found {} components", result.nodes.len()),
///         Err(e) => eprintln!("Analysis failed: {}", e),
///     }
/// }
/// ```
pub trait LanguageBackend: Send + Sync + fmt::Debug {
    /// Returns the backend name (e.g., "Kotlin").
    fn name(&self) -> &str;

    /// Returns the file extensions this backend handles.
    ///
    /// Extensions include the dot (e.g., ".kt").
    fn supported_extensions(&self) -> &[String];

    /// Extracts at most one component from the text of a single file.
    fn scan_source(&self, contents: &str) -> Option<ExtractedComponent>;

    /// Analyzes the source tree under `options.project_root`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the project root is unusable. Per-file and
    /// per-stage failures are recorded in `AnalysisResult.errors` instead.
    fn analyze(&self, options: AnalysisOptions) -> Result<AnalysisResult>;

    /// Validates that this backend can analyze the given project.
    ///
    /// This is called before `analyze()` to provide early feedback.
    fn validate(&self, options: &AnalysisOptions) -> Result<()> {
        if !options.project_root.is_dir() {
            return Err(Error::ProjectRootNotFound {
                path: options.project_root.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // Mock backend for testing
    #[derive(Debug)]
    struct MockBackend {
        extensions: Vec<String>,
    }

    impl LanguageBackend for MockBackend {
        fn name(&self) -> &str {
            "Mock"
        }

        fn supported_extensions(&self) -> &[String] {
            &self.extensions
        }

        fn scan_source(&self, contents: &str) -> Option<ExtractedComponent> {
            contents
                .strip_prefix("component ")
                .map(|name| ExtractedComponent::new(name.trim()))
        }

        fn analyze(&self, options: AnalysisOptions) -> Result<AnalysisResult> {
            self.validate(&options)?;
            Ok(AnalysisResult::new())
        }
    }

    fn backend() -> MockBackend {
        MockBackend {
            extensions: vec![".mock".to_string()],
        }
    }

    #[test]
    fn test_default_validate_rejects_missing_root() {
        let options = AnalysisOptions {
            project_root: PathBuf::from("/nonexistent/knit/root"),
            ..Default::default()
        };
        let err = backend().analyze(options).unwrap_err();
        assert!(matches!(err, Error::ProjectRootNotFound { .. }));
    }

    #[test]
    fn test_default_validate_accepts_directory() {
        let temp = TempDir::new().unwrap();
        let options = AnalysisOptions {
            project_root: temp.path().to_path_buf(),
            ..Default::default()
        };
        assert!(backend().analyze(options).is_ok());
    }

    #[test]
    fn test_trait_object_scan() {
        let backend: Box<dyn LanguageBackend> = Box::new(backend());
        assert_eq!(backend.supported_extensions(), &[".mock".to_string()]);
        assert_eq!(
            backend.scan_source("component Foo"),
            Some(ExtractedComponent::new("Foo"))
        );
    }
}
