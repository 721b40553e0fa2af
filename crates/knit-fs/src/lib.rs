//! Filesystem plumbing for Knit.
//!
//! - [`Workspace`]: a temporary directory owned by one analysis and removed
//!   on drop
//! - [`extract_archive`]: unpacks an uploaded zip into a workspace, refusing
//!   entries that would escape it
//! - [`discover_files`]: walks a tree with the `ignore` crate and returns the
//!   matching source files in sorted order, plus the entries it had to skip
//!
//! # Example
//!
//! ```no_run
//! use knit_fs::{discover_files, extract_archive, DiscoveryOptions, ExtractionLimits, Workspace};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("project.zip")?;
//! let workspace = Workspace::new()?;
//! extract_archive(&bytes, workspace.root(), &ExtractionLimits::default())?;
//! let found = discover_files(
//!     workspace.root(),
//!     &[".kt".to_string()],
//!     &[],
//!     &DiscoveryOptions::default(),
//! )?;
//! println!("{} Kotlin files, {} skipped", found.files.len(), found.skipped.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod discovery;
pub mod workspace;

pub use archive::{extract_archive, extract_reader, ExtractionLimits, ExtractionSummary};
pub use discovery::{discover_files, DiscoveredFiles, DiscoveryOptions};
pub use workspace::Workspace;
