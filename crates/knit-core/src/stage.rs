//! Post-graph analysis stages.
//!
//! Every pass that runs over a built graph is an [`AnalysisStage`]. Stages
//! run in registration order against the same result; a failing stage is
//! recorded in `errors` and the next stage still runs.

use crate::circular_deps::detect_cycles;
use crate::error::DetectionError;
use crate::suggestions::suggest;
use crate::types::{AnalysisResult, CycleMode};
use crate::unused::detect_unused;
use std::fmt;
use tracing::{debug, warn};

/// A pass over the dependency graph.
///
/// # Thread Safety
///
/// Implementations must be Send + Sync so one pipeline can serve concurrent
/// requests. Stages hold configuration only; all per-request state lives in
/// the `AnalysisResult` they are given.
pub trait AnalysisStage: Send + Sync + fmt::Debug {
    /// Stage name used in logs and error messages.
    fn name(&self) -> &str;

    /// Annotates `result` in place.
    ///
    /// On error the stage must leave `result` as it found it.
    fn run(&self, result: &mut AnalysisResult) -> Result<(), DetectionError>;
}

/// Marks circular dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleStage {
    pub mode: CycleMode,
}

impl AnalysisStage for CycleStage {
    fn name(&self) -> &str {
        "cycle detection"
    }

    fn run(&self, result: &mut AnalysisResult) -> Result<(), DetectionError> {
        let found = detect_cycles(result, self.mode)?;
        debug!(cycles = found, mode = ?self.mode, "cycle detection finished");
        Ok(())
    }
}

/// Marks components nothing depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnusedStage;

impl AnalysisStage for UnusedStage {
    fn name(&self) -> &str {
        "unused dependency detection"
    }

    fn run(&self, result: &mut AnalysisResult) -> Result<(), DetectionError> {
        let found = detect_unused(result);
        debug!(unused = found, "unused dependency detection finished");
        Ok(())
    }
}

/// Adds grouping, dangling-target and cycle-summary suggestions.
#[derive(Debug, Clone, Copy)]
pub struct AdvisoryStage {
    pub fan_out_threshold: usize,
}

impl AnalysisStage for AdvisoryStage {
    fn name(&self) -> &str {
        "suggestions"
    }

    fn run(&self, result: &mut AnalysisResult) -> Result<(), DetectionError> {
        suggest(result, self.fan_out_threshold);
        Ok(())
    }
}

/// Extension point that does nothing until someone implements it.
#[derive(Debug, Clone)]
pub struct NoopStage {
    name: String,
}

impl NoopStage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Placeholder for library version conflict checks.
    pub fn version_conflicts() -> Self {
        Self::new("version conflict detection")
    }

    /// Placeholder for layout and styling passes.
    pub fn visualization() -> Self {
        Self::new("visualization enhancement")
    }
}

impl AnalysisStage for NoopStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, _result: &mut AnalysisResult) -> Result<(), DetectionError> {
        Ok(())
    }
}

/// Ordered list of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn AnalysisStage>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// cycles → unused → suggestions (if enabled) → version conflicts →
    /// visualization.
    pub fn standard(cycle_mode: CycleMode, fan_out_threshold: Option<usize>) -> Self {
        let mut pipeline = Self::new();
        pipeline.register(Box::new(CycleStage { mode: cycle_mode }));
        pipeline.register(Box::new(UnusedStage));
        if let Some(fan_out_threshold) = fan_out_threshold {
            pipeline.register(Box::new(AdvisoryStage { fan_out_threshold }));
        }
        pipeline.register(Box::new(NoopStage::version_conflicts()));
        pipeline.register(Box::new(NoopStage::visualization()));
        pipeline
    }

    /// Appends a stage.
    pub fn register(&mut self, stage: Box<dyn AnalysisStage>) {
        self.stages.push(stage);
    }

    /// Returns all registered stages.
    pub fn stages(&self) -> &[Box<dyn AnalysisStage>] {
        &self.stages
    }

    /// Runs every stage against `result`, recording failures as errors.
    pub fn run(&self, result: &mut AnalysisResult) {
        for stage in &self.stages {
            debug!(stage = stage.name(), "running stage");
            if let Err(e) = stage.run(result) {
                warn!(stage = stage.name(), error = %e, "stage failed, continuing");
                result.push_error(format!("{} failed: {}", stage.name(), e));
            }
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field(
                "stages",
                &self.stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
