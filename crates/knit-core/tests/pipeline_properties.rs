//! Graph pipeline properties over generated component sets.

use knit_core::{
    Canvas, CycleMode, ExtractedComponent, GraphBuilder, Pipeline, Severity, CYCLE_ISSUE,
    UNUSED_ISSUE,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn components() -> impl Strategy<Value = Vec<ExtractedComponent>> {
    let name = prop::sample::select(vec!["A", "B", "C", "D", "E", "F"]);
    prop::collection::vec(
        (name.clone(), prop::collection::vec(name, 0..4)),
        0..8,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(n, deps)| ExtractedComponent::new(n).with_dependencies(deps))
            .collect()
    })
}

#[test]
fn three_node_cycle_is_fully_marked() {
    let components = vec![
        ExtractedComponent::new("A").with_dependencies(["B"]),
        ExtractedComponent::new("B").with_dependencies(["C"]),
        ExtractedComponent::new("C").with_dependencies(["A"]),
    ];
    let mut result = GraphBuilder::seeded(Canvas::default(), 0).build(components);
    Pipeline::standard(CycleMode::StackSnapshot, None).run(&mut result);

    assert_eq!(result.count_severity(Severity::Critical), 3);
    for edge in &result.edges {
        assert_eq!(edge.thickness, 3);
        assert!(edge.issues.contains(&CYCLE_ISSUE.to_string()));
    }
    // Everything is a target of something, so nothing is unused.
    assert!(result.nodes.iter().all(|n| !n.issues.contains(&UNUSED_ISSUE.to_string())));
}

proptest! {
    #[test]
    fn edge_count_matches_declared_dependencies(components in components()) {
        let expected: usize = components.iter().map(|c| c.dependencies.len()).sum();
        let result = GraphBuilder::seeded(Canvas::default(), 5).build(components);
        prop_assert_eq!(result.edges.len(), expected);
    }

    #[test]
    fn unused_marks_exactly_untargeted_nodes(components in components()) {
        let mut result = GraphBuilder::seeded(Canvas::default(), 5).build(components);
        Pipeline::standard(CycleMode::StackSnapshot, None).run(&mut result);

        let targets: HashSet<&str> = result.edges.iter().map(|e| e.target.as_str()).collect();
        for node in &result.nodes {
            let flagged = node.issues.iter().any(|i| i == UNUSED_ISSUE);
            prop_assert_eq!(flagged, !targets.contains(node.id.as_str()));
            if flagged && node.severity != Severity::Critical {
                prop_assert_eq!(node.severity, Severity::Unused);
            }
        }
    }

    #[test]
    fn scc_marking_is_never_broader_than_snapshot(components in components()) {
        let built = GraphBuilder::seeded(Canvas::default(), 5).build(components);
        let mut snapshot = built.clone();
        let mut scc = built;
        Pipeline::standard(CycleMode::StackSnapshot, None).run(&mut snapshot);
        Pipeline::standard(CycleMode::StronglyConnected, None).run(&mut scc);

        for node in &scc.nodes {
            if node.severity == Severity::Critical {
                prop_assert_eq!(
                    snapshot.nodes.get(&node.id).map(|n| n.severity),
                    Some(Severity::Critical)
                );
            }
        }
    }

    #[test]
    fn seeded_pipeline_is_idempotent(components in components()) {
        let run = |input: Vec<ExtractedComponent>| {
            let mut result = GraphBuilder::seeded(Canvas::default(), 11).build(input);
            Pipeline::standard(CycleMode::StackSnapshot, Some(3)).run(&mut result);
            result
        };
        prop_assert_eq!(run(components.clone()), run(components));
    }
}
