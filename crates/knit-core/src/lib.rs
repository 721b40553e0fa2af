//! Knit Core - dependency graph model and structural analyses.
//!
//! This crate provides the foundational types and passes for Knit's
//! dependency-injection graph analysis. It defines:
//!
//! - [`Node`], [`Edge`] and [`AnalysisResult`]: the graph handed to callers
//! - [`GraphBuilder`]: turns extracted components into nodes and edges
//! - [`CircularDependencyDetector`] and [`detect_unused`]: the detectors
//! - [`Pipeline`] and [`AnalysisStage`]: ordered post-graph passes
//! - [`LanguageBackend`]: trait for language-specific scanners
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │      knit-cli        │  (CLI + HTTP surface)
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐     ┌──────────┐
//! │ knit-backend-kotlin  │────▶│ knit-fs  │  (archive, discovery)
//! └──────────┬───────────┘     └──────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │      knit-core       │  (This crate - graph + detectors)
//! └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use knit_core::{Canvas, CycleMode, ExtractedComponent, GraphBuilder, Pipeline, Severity};
//!
//! let components = vec![
//!     ExtractedComponent::new("A").with_dependencies(["B"]),
//!     ExtractedComponent::new("B").with_dependencies(["A"]),
//! ];
//! let mut result = GraphBuilder::seeded(Canvas::default(), 1).build(components);
//! Pipeline::standard(CycleMode::StackSnapshot, None).run(&mut result);
//!
//! assert_eq!(result.count_severity(Severity::Critical), 2);
//! ```

pub mod backend;
pub mod circular_deps;
pub mod error;
pub mod graph;
pub mod stage;
pub mod suggestions;
pub mod types;
pub mod unused;
pub mod validation;

// Re-export core types for convenience
pub use backend::LanguageBackend;
pub use circular_deps::{
    detect_cycles, mark_cycles, CircularDependency, CircularDependencyDetector, CYCLE_ISSUE,
    CYCLE_THICKNESS,
};
pub use error::{DetectionError, Error, ExtractionError, Result, ScanError};
pub use graph::{Canvas, GraphBuilder};
pub use stage::{AdvisoryStage, AnalysisStage, CycleStage, NoopStage, Pipeline, UnusedStage};
pub use suggestions::DEFAULT_FAN_OUT_THRESHOLD;
pub use types::{
    AnalysisOptions, AnalysisResult, CycleMode, Edge, ExtractedComponent, FileReport, Node,
    NodeSet, Severity,
};
pub use unused::{detect_unused, UNUSED_ISSUE};
