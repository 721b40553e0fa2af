//! Unused dependency detection.
//!
//! A node is unused when no edge points at it. Cycle membership wins over
//! this: a `critical` node keeps its severity but still gets the issue.

use crate::types::{AnalysisResult, Severity};
use std::collections::HashSet;

/// Issue attached to nodes that are never injected anywhere.
pub const UNUSED_ISSUE: &str = "Unused dependency";

/// Marks nodes that never appear as an edge target. Returns how many were found.
pub fn detect_unused(result: &mut AnalysisResult) -> usize {
    let used: HashSet<&str> = result.edges.iter().map(|e| e.target.as_str()).collect();

    let unused: Vec<String> = result
        .nodes
        .iter()
        .filter(|n| !used.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();

    for id in &unused {
        if let Some(node) = result.nodes.get_mut(id) {
            if node.severity < Severity::Unused {
                node.severity = Severity::Unused;
            }
            node.add_issue(UNUSED_ISSUE);
        }
    }
    unused.len()
}
