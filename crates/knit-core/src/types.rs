//! Core types for the Knit dependency graph.
//!
//! The wire shape of [`Node`], [`Edge`] and [`AnalysisResult`] is consumed by
//! the graph frontend, so field names are part of the public contract.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::path::PathBuf;

/// Visual priority of a node: `normal < unused < critical`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// No detector flagged the node.
    #[default]
    Normal,

    /// Never the target of an edge.
    Unused,

    /// Participates in a circular dependency.
    Critical,
}

impl Severity {
    /// Short name used by formatters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Unused => "unused",
            Severity::Critical => "critical",
        }
    }
}

/// A provider declaration found by the scanner, with the names it injects.
///
/// Only lives between scanning and graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedComponent {
    /// Name taken from the provider declaration.
    pub name: String,

    /// Injected dependency names, in file order.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ExtractedComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }
}

/// A component in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Component name.
    pub id: String,

    /// Display name (same as `id`).
    pub label: String,

    /// Layout x coordinate, fixed at creation.
    pub x: f64,

    /// Layout y coordinate, fixed at creation.
    pub y: f64,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub issues: Vec<String>,

    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Node {
    /// Creates a `normal` node with empty issue and suggestion lists.
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            id: name,
            x,
            y,
            severity: Severity::Normal,
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Appends `issue` unless the node already carries it.
    pub fn add_issue(&mut self, issue: &str) {
        if !self.issues.iter().any(|i| i == issue) {
            self.issues.push(issue.to_string());
        }
    }
}

/// A directed dependency from `source` to `target`.
///
/// `target` may name a component that was never declared (a dangling edge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,

    /// Drawing weight. 1 by default, raised for edges inside a cycle.
    pub thickness: u32,

    #[serde(default)]
    pub issues: Vec<String>,

    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Edge {
    /// Default drawing weight.
    pub const DEFAULT_THICKNESS: u32 = 1;

    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: Self::edge_id(&source, &target),
            label: format!("{} → {}", source, target),
            source,
            target,
            thickness: Self::DEFAULT_THICKNESS,
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Deterministic id for a `(source, target)` pair.
    pub fn edge_id(source: &str, target: &str) -> String {
        format!("{}_{}", source, target)
    }

    /// Appends `issue` unless the edge already carries it.
    pub fn add_issue(&mut self, issue: &str) {
        if !self.issues.iter().any(|i| i == issue) {
            self.issues.push(issue.to_string());
        }
    }
}

/// Nodes keyed by id, kept in first-insertion order.
///
/// Inserting a node whose id already exists replaces it in place.
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSet {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node`, returning the node it replaced (if any).
    pub fn insert(&mut self, node: Node) -> Option<Node> {
        match self.index.get(&node.id) {
            Some(&slot) => Some(std::mem::replace(&mut self.nodes[slot], node)),
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        match self.index.get(id) {
            Some(&slot) => self.nodes.get_mut(slot),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Node> for NodeSet {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        let mut set = NodeSet::new();
        for node in iter {
            set.insert(node);
        }
        set
    }
}

impl Serialize for NodeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NodeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<Node>::deserialize(deserializer).map(NodeSet::from_iter)
    }
}

/// Result of analyzing one upload.
///
/// An empty graph with a populated `errors` list means the analysis was
/// degraded, not that the request failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub nodes: NodeSet,

    #[serde(default)]
    pub edges: Vec<Edge>,

    /// Errors encountered (non-fatal).
    #[serde(default)]
    pub errors: Vec<String>,

    /// Project-level advice.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result carrying only `error`, used when the pipeline aborts early.
    pub fn failed(error: impl ToString) -> Self {
        Self {
            errors: vec![error.to_string()],
            ..Self::default()
        }
    }

    pub fn push_error(&mut self, error: impl ToString) {
        self.errors.push(error.to_string());
    }

    /// True when nothing was extracted and at least one error was recorded.
    pub fn is_degraded(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && !self.errors.is_empty()
    }

    /// Number of nodes with the given severity.
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.nodes.iter().filter(|n| n.severity == severity).count()
    }
}

/// Quick report for a single uploaded source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    /// The provider marker occurs somewhere in the file.
    pub has_provides: bool,

    /// The injection marker occurs somewhere in the file.
    pub has_di: bool,

    /// Component extracted with the regular line scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ExtractedComponent>,

    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// How much of the graph a detected cycle marks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleMode {
    /// Mark everything on the DFS stack when a back edge is found.
    ///
    /// Can over-mark nodes that lead into a cycle without being part of it.
    #[default]
    StackSnapshot,

    /// Mark only members of strongly connected components.
    StronglyConnected,
}

/// Options for a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Directory holding the source tree.
    pub project_root: PathBuf,

    /// Cycle marking breadth.
    pub cycle_mode: CycleMode,

    /// Seed for node positions. `None` draws from OS entropy.
    pub layout_seed: Option<u64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            cycle_mode: CycleMode::default(),
            layout_seed: None,
        }
    }
}
