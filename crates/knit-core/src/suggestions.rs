//! Advisory pass over an annotated graph.

use crate::circular_deps::CYCLE_ISSUE;
use crate::types::AnalysisResult;
use std::collections::{BTreeSet, HashMap};

/// Nodes with more outgoing edges than this get a grouping suggestion.
pub const DEFAULT_FAN_OUT_THRESHOLD: usize = 3;

/// Adds node and project suggestions. Never changes severity, issues or
/// thickness.
pub fn suggest(result: &mut AnalysisResult, fan_out_threshold: usize) {
    let mut fan_out: HashMap<&str, usize> = HashMap::new();
    for edge in &result.edges {
        *fan_out.entry(edge.source.as_str()).or_default() += 1;
    }

    let crowded: Vec<(String, usize)> = fan_out
        .into_iter()
        .filter(|&(_, count)| count > fan_out_threshold)
        .map(|(id, count)| (id.to_string(), count))
        .collect();
    for (id, count) in crowded {
        if let Some(node) = result.nodes.get_mut(&id) {
            let suggestion = format!("Consider grouping {} dependencies.", count);
            if !node.suggestions.contains(&suggestion) {
                node.suggestions.push(suggestion);
            }
        }
    }

    let dangling: BTreeSet<&str> = result
        .edges
        .iter()
        .filter(|e| !result.nodes.contains(&e.target))
        .map(|e| e.target.as_str())
        .collect();
    let mut project: Vec<String> = dangling
        .into_iter()
        .map(|target| format!("'{}' is injected but never provided", target))
        .collect();

    let cyclic = result
        .edges
        .iter()
        .filter(|e| e.issues.iter().any(|i| i == CYCLE_ISSUE))
        .count();
    if cyclic > 0 {
        project.push(format!(
            "Break {} circular dependency edge(s) between critical components",
            cyclic
        ));
    }

    for suggestion in project {
        if !result.suggestions.contains(&suggestion) {
            result.suggestions.push(suggestion);
        }
    }
}
