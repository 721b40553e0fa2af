//! Single-file inspection.
//!
//! A lighter check than a project analysis: reports whether a file mentions
//! the provider and injection markers at all, alongside the component the
//! regular line scan extracts from it.

use crate::scanner::{scan_source, Markers};
use knit_core::FileReport;

/// Inspects the text of one source file.
pub fn inspect_source(contents: &str, markers: &Markers) -> FileReport {
    let has_provides = contents.contains(&markers.provider_marker);
    let has_di = contents.contains(&markers.injection_marker);

    let mut report = FileReport {
        has_provides,
        has_di,
        component: scan_source(contents, markers),
        ..Default::default()
    };

    if has_provides {
        report.suggestions.push(format!(
            "Consider reviewing {} usage.",
            markers.provider_marker
        ));
    }
    if has_di {
        report
            .suggestions
            .push("Check DI implementation.".to_string());
    }
    if !has_provides && !has_di {
        report
            .errors
            .push(format!("No {} or DI found.", markers.provider_marker));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use knit_core::ExtractedComponent;

    #[test]
    fn test_both_markers() {
        let report = inspect_source(
            "@Provides class Repo\nprivate val api by di\n",
            &Markers::default(),
        );

        assert!(report.has_provides);
        assert!(report.has_di);
        assert_eq!(
            report.suggestions,
            vec!["Consider reviewing @Provides usage.", "Check DI implementation."]
        );
        assert!(report.errors.is_empty());
        assert_eq!(
            report.component,
            Some(ExtractedComponent::new("Repo").with_dependencies(["api"]))
        );
    }

    #[test]
    fn test_injection_only() {
        let report = inspect_source("val api by di", &Markers::default());
        assert!(!report.has_provides);
        assert!(report.has_di);
        assert_eq!(report.suggestions, vec!["Check DI implementation."]);
        assert_eq!(report.component, None);
    }

    #[test]
    fn test_marker_mention_without_declaration() {
        // The marker counts even where no component can be extracted
        let report = inspect_source("// uses @Provides elsewhere", &Markers::default());
        assert!(report.has_provides);
        assert_eq!(report.component, None);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_neither_marker() {
        let report = inspect_source("fun main() {}", &Markers::default());
        assert!(!report.has_provides);
        assert!(!report.has_di);
        assert!(report.suggestions.is_empty());
        assert_eq!(report.errors, vec!["No @Provides or DI found."]);
    }
}
