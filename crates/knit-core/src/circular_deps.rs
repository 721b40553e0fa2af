//! Circular dependency detection.
//!
//! Two marking strategies are available (see [`CycleMode`]):
//!
//! - **Stack snapshot**: depth-first search from every adjacency source; when a
//!   back edge is found, everything on the DFS stack at that moment is a cycle
//!   group. The search from that root stops there and the on-stack set is left
//!   as it was, so nodes that merely lead into a cycle get marked as well.
//! - **Strongly connected**: Tarjan's SCC algorithm. Only real cycle members
//!   are marked.
//!
//! Both searches keep an explicit frame stack, so chain length is bounded by
//! memory rather than the call stack. Time complexity: O(V + E) for both.

use crate::error::DetectionError;
use crate::types::{AnalysisResult, CycleMode, Edge, Severity};
use std::collections::{BTreeSet, HashMap, HashSet};

const MAX_MODULES: usize = 100_000;

/// Issue attached to every edge inside a detected cycle.
pub const CYCLE_ISSUE: &str = "Circular dependency detected";

/// Thickness given to edges inside a detected cycle.
pub const CYCLE_THICKNESS: u32 = 3;

/// Node ids that a detector reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularDependency {
    pub members: BTreeSet<String>,
}

impl CircularDependency {
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }
}

/// Adjacency list keyed by node index, in first-appearance order.
struct Adjacency<'a> {
    names: Vec<&'a str>,
    ids: HashMap<&'a str, usize>,
    targets: Vec<Vec<usize>>,
    sources: Vec<usize>,
}

impl<'a> Adjacency<'a> {
    fn from_edges(edges: &'a [Edge]) -> Self {
        let mut adjacency = Adjacency {
            names: Vec::new(),
            ids: HashMap::new(),
            targets: Vec::new(),
            sources: Vec::new(),
        };
        for edge in edges {
            let source = adjacency.intern(&edge.source);
            let target = adjacency.intern(&edge.target);
            if adjacency.targets[source].is_empty() {
                adjacency.sources.push(source);
            }
            adjacency.targets[source].push(target);
        }
        adjacency
    }

    fn intern(&mut self, name: &'a str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name);
        self.ids.insert(name, id);
        self.targets.push(Vec::new());
        id
    }

    fn group(&self, members: impl IntoIterator<Item = usize>) -> CircularDependency {
        CircularDependency {
            members: members
                .into_iter()
                .map(|id| self.names[id].to_string())
                .collect(),
        }
    }
}

/// Finds cycle groups in a set of edges.
pub struct CircularDependencyDetector<'a> {
    graph: Adjacency<'a>,
    mode: CycleMode,
}

impl<'a> CircularDependencyDetector<'a> {
    /// Creates a detector over `edges`.
    pub fn new(edges: &'a [Edge], mode: CycleMode) -> Self {
        Self {
            graph: Adjacency::from_edges(edges),
            mode,
        }
    }

    /// Finds all cycle groups.
    ///
    /// # Errors
    /// `DetectionError::GraphTooLarge` if the graph has more than 100 000 sources.
    pub fn find_cycles(&self) -> Result<Vec<CircularDependency>, DetectionError> {
        if self.graph.sources.len() > MAX_MODULES {
            return Err(DetectionError::GraphTooLarge {
                node_count: self.graph.sources.len(),
                max_allowed: MAX_MODULES,
            });
        }

        match self.mode {
            CycleMode::StackSnapshot => Ok(self.stack_snapshots()),
            CycleMode::StronglyConnected => Ok(Tarjan::new(&self.graph).run()),
        }
    }

    fn stack_snapshots(&self) -> Vec<CircularDependency> {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut cycles = Vec::new();

        for &root in &self.graph.sources {
            if visited.contains(&root) {
                continue;
            }
            if self.search_from(root, &mut visited, &mut on_stack) {
                cycles.push(self.graph.group(on_stack.iter().copied()));
            }
        }
        cycles
    }

    /// Iterative DFS. Returns true as soon as a back edge is found, leaving
    /// `on_stack` untouched from that point.
    fn search_from(
        &self,
        root: usize,
        visited: &mut HashSet<usize>,
        on_stack: &mut HashSet<usize>,
    ) -> bool {
        visited.insert(root);
        on_stack.insert(root);

        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(frame) = frames.last_mut() {
            let (node, cursor) = *frame;
            frame.1 += 1;

            match self.graph.targets[node].get(cursor) {
                Some(&target) => {
                    if on_stack.contains(&target) {
                        return true;
                    }
                    if visited.insert(target) {
                        on_stack.insert(target);
                        frames.push((target, 0));
                    }
                }
                None => {
                    on_stack.remove(&node);
                    frames.pop();
                }
            }
        }
        false
    }
}

/// Tarjan's algorithm over the interned adjacency list.
struct Tarjan<'g, 'a> {
    graph: &'g Adjacency<'a>,
    index_counter: usize,
    stack: Vec<usize>,
    indices: Vec<Option<usize>>,
    low_links: Vec<usize>,
    on_stack: Vec<bool>,
    sccs: Vec<CircularDependency>,
}

impl<'g, 'a> Tarjan<'g, 'a> {
    fn new(graph: &'g Adjacency<'a>) -> Self {
        let n = graph.names.len();
        Self {
            graph,
            index_counter: 0,
            stack: Vec::new(),
            indices: vec![None; n],
            low_links: vec![0; n],
            on_stack: vec![false; n],
            sccs: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<CircularDependency> {
        for root in 0..self.graph.names.len() {
            if self.indices[root].is_none() {
                self.strongconnect(root);
            }
        }
        self.sccs
    }

    fn visit(&mut self, v: usize) {
        self.indices[v] = Some(self.index_counter);
        self.low_links[v] = self.index_counter;
        self.index_counter += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    /// Frames are `(node, next target cursor)`. A frame is popped once all
    /// of its targets are explored, which is where the recursive form would
    /// return to its caller.
    fn strongconnect(&mut self, root: usize) {
        let graph = self.graph;
        self.visit(root);

        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some(frame) = frames.last_mut() {
            let (v, cursor) = *frame;
            frame.1 += 1;

            match graph.targets[v].get(cursor) {
                Some(&w) => match self.indices[w] {
                    None => {
                        self.visit(w);
                        frames.push((w, 0));
                    }
                    Some(w_index) if self.on_stack[w] => {
                        self.low_links[v] = self.low_links[v].min(w_index);
                    }
                    Some(_) => {}
                },
                None => {
                    frames.pop();
                    if let Some(&(parent, _)) = frames.last() {
                        self.low_links[parent] = self.low_links[parent].min(self.low_links[v]);
                    }
                    if Some(self.low_links[v]) == self.indices[v] {
                        self.pop_component(v);
                    }
                }
            }
        }
    }

    fn pop_component(&mut self, v: usize) {
        let mut scc = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            scc.push(w);
            if w == v {
                break;
            }
        }
        // Single nodes only count when they depend on themselves.
        if scc.len() > 1 || self.graph.targets[v].contains(&v) {
            self.sccs.push(self.graph.group(scc));
        }
    }
}

/// Marks cycle members in `result`.
///
/// Nodes in a group become `critical`. Edges whose endpoints are both in the
/// same group get [`CYCLE_THICKNESS`] and the [`CYCLE_ISSUE`] issue.
pub fn mark_cycles(result: &mut AnalysisResult, cycles: &[CircularDependency]) {
    for cycle in cycles {
        for node in result.nodes.iter_mut() {
            if cycle.contains(&node.id) {
                node.severity = Severity::Critical;
            }
        }
        for edge in &mut result.edges {
            if cycle.contains(&edge.source) && cycle.contains(&edge.target) {
                edge.thickness = CYCLE_THICKNESS;
                edge.add_issue(CYCLE_ISSUE);
            }
        }
    }
}

/// Finds and marks cycles, returning how many groups were found.
pub fn detect_cycles(result: &mut AnalysisResult, mode: CycleMode) -> Result<usize, DetectionError> {
    let cycles = CircularDependencyDetector::new(&result.edges, mode).find_cycles()?;
    mark_cycles(result, &cycles);
    Ok(cycles.len())
}
