//! Kotlin analysis backend for Knit.
//!
//! This crate provides a [`LanguageBackend`](knit_core::LanguageBackend)
//! implementation that finds dependency-injection components in Kotlin
//! sources by textual markers (`@Provides class X`, `val y by di`), then
//! hands them to the `knit-core` graph pipeline.
//!
//! # Example
//!
//! ```no_run
//! use knit_backend_kotlin::KotlinBackend;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = KotlinBackend::new();
//! let result = backend.analyze_dir(Path::new("app/src"))?;
//! println!("Analyzed {} components", result.nodes.len());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod file_discovery;
pub mod quick;
pub mod scanner;

pub use backend::KotlinBackend;
pub use file_discovery::DiscoveryConfig;
pub use quick::inspect_source;
pub use scanner::{scan_source, Markers};
