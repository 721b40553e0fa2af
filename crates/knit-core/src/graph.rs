//! Graph construction from extracted components.

use crate::types::{AnalysisResult, Edge, ExtractedComponent, Node};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Rectangle that synthetic node positions are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            min_x: 100.0,
            min_y: 100.0,
            width: 600.0,
            height: 400.0,
        }
    }
}

impl Canvas {
    /// A canvas with no area cannot place anything.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
        (
            sample_axis(rng, self.min_x, self.width),
            sample_axis(rng, self.min_y, self.height),
        )
    }
}

fn sample_axis<R: Rng>(rng: &mut R, min: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        rng.gen_range(min..min + extent)
    } else {
        min
    }
}

/// Turns extracted components into nodes and edges.
///
/// Each component becomes a node at a uniformly random canvas position, and
/// each of its dependencies becomes an edge. Dependency targets are not
/// checked, so edges may dangle.
pub struct GraphBuilder<R: Rng = StdRng> {
    canvas: Canvas,
    rng: R,
}

impl GraphBuilder<StdRng> {
    /// Reproducible layout.
    pub fn seeded(canvas: Canvas, seed: u64) -> Self {
        Self::with_rng(canvas, StdRng::seed_from_u64(seed))
    }

    /// Layout drawn from OS entropy.
    pub fn from_entropy(canvas: Canvas) -> Self {
        Self::with_rng(canvas, StdRng::from_entropy())
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn for_seed(canvas: Canvas, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(canvas, seed),
            None => Self::from_entropy(canvas),
        }
    }
}

impl<R: Rng> GraphBuilder<R> {
    pub fn with_rng(canvas: Canvas, rng: R) -> Self {
        Self { canvas, rng }
    }

    /// Adds one component to `result`.
    ///
    /// A component whose name already has a node replaces that node; edges
    /// added for the earlier component stay.
    pub fn add_component(&mut self, result: &mut AnalysisResult, component: ExtractedComponent) {
        let (x, y) = self.canvas.sample(&mut self.rng);
        let ExtractedComponent { name, dependencies } = component;

        for dependency in dependencies {
            result.edges.push(Edge::new(name.as_str(), dependency));
        }
        result.nodes.insert(Node::new(name, x, y));
    }

    /// Builds a fresh result from `components`.
    pub fn build<I>(mut self, components: I) -> AnalysisResult
    where
        I: IntoIterator<Item = ExtractedComponent>,
    {
        let mut result = AnalysisResult::new();
        for component in components {
            self.add_component(&mut result, component);
        }
        result
    }
}
