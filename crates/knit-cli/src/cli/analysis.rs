//! `knit analyze`: archive or directory analysis.

use crate::formatters::OutputFormat;
use anyhow::{Context, Result};
use knit_backend_kotlin::KotlinBackend;
use knit_config::KnitConfig;
use knit_core::{AnalysisResult, CycleMode};
use std::path::PathBuf;
use tracing::info;

/// Options for running analysis.
#[derive(Debug, Clone)]
pub struct AnalysisRunOptions {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub seed: Option<u64>,
    pub strict_cycles: bool,
}

/// Applies command-line overrides on top of the loaded config.
pub fn effective_config(config: &KnitConfig, options: &AnalysisRunOptions) -> KnitConfig {
    let mut config = config.clone();
    if options.seed.is_some() {
        config.layout.seed = options.seed;
    }
    if options.strict_cycles {
        config.cycles.mode = CycleMode::StronglyConnected;
    }
    config
}

/// Runs the analysis with the given options.
///
/// Exits with status 1 when an archive cannot be extracted; the single
/// error is still printed in the requested format first.
pub fn run_analysis(config: &KnitConfig, options: &AnalysisRunOptions) -> Result<()> {
    let backend = KotlinBackend::from_config(&effective_config(config, options));
    let formatter = options.format.formatter();

    if options.path.is_dir() {
        info!(path = %options.path.display(), "analyzing directory");
        let result = backend
            .analyze_dir(&options.path)
            .with_context(|| format!("Failed to analyze {}", options.path.display()))?;
        formatter.format(&result);
        return Ok(());
    }

    let bytes = std::fs::read(&options.path)
        .with_context(|| format!("Failed to read {}", options.path.display()))?;
    info!(path = %options.path.display(), bytes = bytes.len(), "analyzing archive");

    match backend.try_analyze_archive(&bytes) {
        Ok(result) => {
            formatter.format(&result);
            Ok(())
        }
        Err(e) => {
            let result = AnalysisResult::failed(format!("Failed to process project: {}", e));
            formatter.format(&result);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let config = KnitConfig::default();
        let options = AnalysisRunOptions {
            path: PathBuf::from("project.zip"),
            format: OutputFormat::Json,
            seed: Some(11),
            strict_cycles: true,
        };

        let effective = effective_config(&config, &options);
        assert_eq!(effective.layout.seed, Some(11));
        assert_eq!(effective.cycles.mode, CycleMode::StronglyConnected);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = KnitConfig::default();
        config.layout.seed = Some(3);
        let options = AnalysisRunOptions {
            path: PathBuf::from("."),
            format: OutputFormat::Human,
            seed: None,
            strict_cycles: false,
        };

        let effective = effective_config(&config, &options);
        assert_eq!(effective, config);
    }
}
