use crate::file_discovery::{discover_source_files, validate_project_root, DiscoveryConfig};
use crate::quick::inspect_source;
use crate::scanner::{scan_file, scan_source, Markers};
use knit_config::KnitConfig;
use knit_core::{
    AnalysisOptions, AnalysisResult, Canvas, CycleMode, ExtractedComponent, FileReport,
    GraphBuilder, LanguageBackend, Pipeline, Result, Severity, DEFAULT_FAN_OUT_THRESHOLD,
};
use knit_fs::{extract_archive, ExtractionLimits, Workspace};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Kotlin dependency-injection backend.
///
/// Scans `.kt` sources for provider and injection markers, builds the
/// component graph and runs the detection pipeline over it. One backend can
/// serve any number of concurrent analyses; every call owns its own
/// working directory and result.
///
/// # Examples
///
/// ```no_run
/// use knit_backend_kotlin::KotlinBackend;
///
/// let bytes = std::fs::read("project.zip").unwrap();
/// let result = KotlinBackend::default().analyze_archive(&bytes);
/// println!("{} components, {} errors", result.nodes.len(), result.errors.len());
/// ```
#[derive(Debug, Clone)]
pub struct KotlinBackend {
    markers: Markers,
    discovery: DiscoveryConfig,
    limits: ExtractionLimits,
    canvas: Canvas,
    cycle_mode: CycleMode,
    layout_seed: Option<u64>,
    fan_out_threshold: Option<usize>,
    workspace_parent: Option<PathBuf>,
}

impl Default for KotlinBackend {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            discovery: DiscoveryConfig::default(),
            limits: ExtractionLimits::default(),
            canvas: Canvas::default(),
            cycle_mode: CycleMode::default(),
            layout_seed: None,
            fan_out_threshold: Some(DEFAULT_FAN_OUT_THRESHOLD),
            workspace_parent: None,
        }
    }
}

impl KotlinBackend {
    /// Creates a backend with the default markers and limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend from a loaded configuration.
    pub fn from_config(config: &KnitConfig) -> Self {
        Self {
            markers: Markers::from(&config.scanner),
            discovery: DiscoveryConfig::from(&config.scanner),
            limits: config.limits,
            canvas: config.layout.canvas,
            cycle_mode: config.cycles.mode,
            layout_seed: config.layout.seed,
            fan_out_threshold: config.fan_out_threshold(),
            workspace_parent: None,
        }
    }

    /// Unpack archives under `parent` instead of the system temp directory.
    pub fn with_workspace_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.workspace_parent = Some(parent.into());
        self
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Analysis options for `root` using this backend's configured cycle
    /// mode and layout seed.
    pub fn options_for(&self, root: &Path) -> AnalysisOptions {
        AnalysisOptions {
            project_root: root.to_path_buf(),
            cycle_mode: self.cycle_mode,
            layout_seed: self.layout_seed,
        }
    }

    /// Analyzes an already extracted source tree.
    pub fn analyze_dir(&self, root: &Path) -> Result<AnalysisResult> {
        let options = self.options_for(root);
        self.validate(&options)?;
        self.analyze(options)
    }

    /// Unpacks `bytes` into a fresh workspace and analyzes it.
    ///
    /// The workspace is removed before this returns, on success and on every
    /// error path.
    ///
    /// # Errors
    ///
    /// Fails when the workspace cannot be created, the archive cannot be
    /// extracted, or a configured ignore pattern is not a valid glob.
    pub fn try_analyze_archive(&self, bytes: &[u8]) -> Result<AnalysisResult> {
        let workspace = match &self.workspace_parent {
            Some(parent) => Workspace::new_in(parent)?,
            None => Workspace::new()?,
        };
        let summary = extract_archive(bytes, workspace.root(), &self.limits)?;
        debug!(files = summary.files, bytes = summary.bytes, "archive unpacked");

        let result = self.analyze(self.options_for(workspace.root()))?;

        if let Err(e) = workspace.close() {
            warn!(error = %e, "failed to remove workspace");
        }
        Ok(result)
    }

    /// Like [`try_analyze_archive`](Self::try_analyze_archive), but a failure
    /// becomes a result holding the single error.
    pub fn analyze_archive(&self, bytes: &[u8]) -> AnalysisResult {
        self.try_analyze_archive(bytes).unwrap_or_else(|e| {
            warn!(error = %e, "failed to process project");
            AnalysisResult::failed(format!("Failed to process project: {}", e))
        })
    }

    /// Reports marker usage in one source file.
    pub fn inspect(&self, contents: &str) -> FileReport {
        inspect_source(contents, &self.markers)
    }

    fn scan_tree(&self, root: &Path) -> Result<(Vec<ExtractedComponent>, Vec<String>)> {
        let discovered = discover_source_files(root, &self.discovery)?;
        debug!(
            files = discovered.files.len(),
            skipped = discovered.skipped.len(),
            root = %root.display(),
            "discovered source files"
        );

        let mut components = Vec::new();
        let mut errors = Vec::new();
        for skipped in &discovered.skipped {
            warn!(error = %skipped, "skipping source entry");
            errors.push(skipped.to_string());
        }
        for path in &discovered.files {
            match scan_file(root, path, &self.markers) {
                Ok(Some(component)) => components.push(component),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "skipping unreadable source file");
                    errors.push(e.to_string());
                }
            }
        }
        Ok((components, errors))
    }
}

impl LanguageBackend for KotlinBackend {
    fn name(&self) -> &str {
        "Kotlin"
    }

    fn supported_extensions(&self) -> &[String] {
        &self.discovery.extensions
    }

    fn scan_source(&self, contents: &str) -> Option<ExtractedComponent> {
        scan_source(contents, &self.markers)
    }

    fn analyze(&self, options: AnalysisOptions) -> Result<AnalysisResult> {
        let (components, scan_errors) = self.scan_tree(&options.project_root)?;

        let mut result =
            GraphBuilder::for_seed(self.canvas, options.layout_seed).build(components);
        result.errors.extend(scan_errors);

        Pipeline::standard(options.cycle_mode, self.fan_out_threshold).run(&mut result);

        info!(
            nodes = result.nodes.len(),
            edges = result.edges.len(),
            critical = result.count_severity(Severity::Critical),
            unused = result.count_severity(Severity::Unused),
            errors = result.errors.len(),
            "analysis complete"
        );
        Ok(result)
    }

    fn validate(&self, options: &AnalysisOptions) -> Result<()> {
        if !options.project_root.is_dir() {
            return Err(knit_core::Error::ProjectRootNotFound {
                path: options.project_root.clone(),
            });
        }
        validate_project_root(&options.project_root)
    }
}
