//! Knit CLI library components.
//!
//! This crate provides the command-line interface and the HTTP surface for
//! Knit's dependency analysis. The main binary is in `main.rs`.

pub mod cli;
pub mod commands;
pub mod formatters;
pub mod server;

// Re-export core types for convenience
pub use knit_core::{AnalysisResult, FileReport};
