//! Output formatters for Knit results.

pub mod human;
pub mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use knit_core::{AnalysisResult, FileReport};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            OutputFormat::Human => Box::new(HumanFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

/// Trait for formatting analysis results
pub trait Formatter {
    /// Format and print a project analysis
    fn format(&self, result: &AnalysisResult);

    /// Format and print a single-file report
    fn format_report(&self, report: &FileReport);
}

impl Formatter for HumanFormatter {
    fn format(&self, result: &AnalysisResult) {
        print!("{}", human::render_results(result));
    }

    fn format_report(&self, report: &FileReport) {
        print!("{}", human::render_report(report));
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, result: &AnalysisResult) {
        json::print_json(result);
    }

    fn format_report(&self, report: &FileReport) {
        json::print_json(report);
    }
}
