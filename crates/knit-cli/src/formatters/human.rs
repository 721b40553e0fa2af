//! Human-readable formatter for analysis results.

use colored::Colorize;
use knit_core::{AnalysisResult, FileReport, Node, Severity};
use std::fmt::Write;

pub struct HumanFormatter;

fn severity_tag(node: &Node) -> String {
    match node.severity {
        Severity::Critical => format!("[{}]", node.severity.as_str()).red().bold().to_string(),
        Severity::Unused => format!("[{}]", node.severity.as_str()).yellow().to_string(),
        Severity::Normal => String::new(),
    }
}

pub fn render_results(result: &AnalysisResult) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "\n{}", "Knit Dependency Analysis".bold());
    let _ = writeln!(out, "========================\n");

    let _ = writeln!(out, "Statistics:");
    let _ = writeln!(out, "  Components: {}", result.nodes.len());
    let _ = writeln!(out, "  Dependencies: {}", result.edges.len());
    let _ = writeln!(
        out,
        "  Critical: {}",
        result.count_severity(Severity::Critical)
    );
    let _ = writeln!(out, "  Unused: {}", result.count_severity(Severity::Unused));

    if !result.nodes.is_empty() {
        let _ = writeln!(out, "\nComponents:");
        for node in &result.nodes {
            let tag = severity_tag(node);
            if tag.is_empty() {
                let _ = writeln!(out, "  {}", node.label);
            } else {
                let _ = writeln!(out, "  {} {}", node.label, tag);
            }
            for issue in &node.issues {
                let _ = writeln!(out, "     ⚠️  {}", issue);
            }
            for suggestion in &node.suggestions {
                let _ = writeln!(out, "     💡 {}", suggestion);
            }
        }
    }

    if !result.edges.is_empty() {
        let _ = writeln!(out, "\nDependencies:");
        for edge in &result.edges {
            let dangling = if result.nodes.contains(&edge.target) {
                ""
            } else {
                " (not provided)"
            };
            if edge.issues.is_empty() {
                let _ = writeln!(out, "  {}{}", edge.label, dangling.dimmed());
            } else {
                let _ = writeln!(
                    out,
                    "  {}{}  {}",
                    edge.label.red(),
                    dangling.dimmed(),
                    edge.issues.join("; ")
                );
            }
        }
    }

    if !result.suggestions.is_empty() {
        let _ = writeln!(out, "\nSuggestions:");
        for suggestion in &result.suggestions {
            let _ = writeln!(out, "  💡 {}", suggestion);
        }
    }

    if !result.errors.is_empty() {
        let _ = writeln!(out, "\n{} ({}):", "Errors".red(), result.errors.len());
        for error in &result.errors {
            let _ = writeln!(out, "  ✗ {}", error);
        }
    }

    if result.nodes.is_empty() && result.errors.is_empty() {
        let _ = writeln!(out, "\nNo provided components found.");
    }

    out
}

pub fn render_report(report: &FileReport) -> String {
    let mut out = String::new();
    let yes_no = |flag: bool| if flag { "yes".green() } else { "no".dimmed() };

    let _ = writeln!(out, "Provider marker: {}", yes_no(report.has_provides));
    let _ = writeln!(out, "Injection marker: {}", yes_no(report.has_di));

    if let Some(component) = &report.component {
        let _ = writeln!(out, "Component: {}", component.name.bold());
        for dependency in &component.dependencies {
            let _ = writeln!(out, "  → {}", dependency);
        }
    }
    for suggestion in &report.suggestions {
        let _ = writeln!(out, "💡 {}", suggestion);
    }
    for error in &report.errors {
        let _ = writeln!(out, "✗ {}", error.red());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use knit_core::{Canvas, CycleMode, ExtractedComponent, GraphBuilder, Pipeline};

    #[test]
    fn test_render_cycle() {
        let mut result = GraphBuilder::seeded(Canvas::default(), 1).build([
            ExtractedComponent::new("A").with_dependencies(["B"]),
            ExtractedComponent::new("B").with_dependencies(["A", "Ghost"]),
        ]);
        Pipeline::standard(CycleMode::StackSnapshot, Some(3)).run(&mut result);

        let text = render_results(&result);

        assert!(text.contains("Components: 2"));
        assert!(text.contains("Critical: 2"));
        assert!(text.contains("critical"));
        assert!(text.contains("Circular dependency detected"));
        assert!(text.contains("not provided"));
        assert!(text.contains("'Ghost' is injected but never provided"));
    }

    #[test]
    fn test_render_failed_result() {
        let result = AnalysisResult::failed("Failed to process project: Invalid archive");
        let text = render_results(&result);
        assert!(text.contains("Errors"));
        assert!(text.contains("Invalid archive"));
        assert!(!text.contains("No provided components found."));
    }

    #[test]
    fn test_render_report() {
        let report = FileReport {
            has_provides: true,
            has_di: false,
            component: Some(ExtractedComponent::new("Repo").with_dependencies(["db"])),
            errors: vec![],
            suggestions: vec!["Consider reviewing @Provides usage.".to_string()],
        };

        let text = render_report(&report);
        assert!(text.contains("Repo"));
        assert!(text.contains("→ db"));
        assert!(text.contains("Consider reviewing @Provides usage."));
    }
}
