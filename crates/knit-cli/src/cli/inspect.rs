//! `knit inspect`: single-file marker report.

use crate::formatters::OutputFormat;
use anyhow::{Context, Result};
use knit_backend_kotlin::KotlinBackend;
use knit_config::KnitConfig;
use std::path::Path;

pub fn run_inspect(config: &KnitConfig, file: &Path, format: OutputFormat) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let contents = String::from_utf8_lossy(&bytes);

    let report = KotlinBackend::from_config(config).inspect(&contents);
    format.formatter().format_report(&report);
    Ok(())
}
