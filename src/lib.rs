//! repoguide - structural summaries of multi-language source trees
//!
//! Walks a directory, analyzes every supported file into a normalized
//! [`FileRecord`], and aggregates the records into a [`Report`] with
//! language statistics, ranked key files, a directory tree view and
//! heuristic architecture insights.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use repoguide::{Config, TreeWalker, aggregate};
//!
//! let config = Config::default();
//! let files = TreeWalker::new(&config).walk(Path::new("."))?;
//! let report = aggregate(files, &config);
//! for insight in &report.insights {
//!     println!("{insight}");
//! }
//! # Ok::<(), repoguide::GuideError>(())
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: language detection, parsing strategies, file analysis, tree walking
//! - [`report`]: stats, ranking, tree view and insights
//! - [`config`]: figment-backed configuration
//! - [`types`]: record data model and errors

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod report;
pub mod types;

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{AnalysisError, GuideError, Result};

// Data Model
pub use types::{AnalysisSet, FileMetadata, FileRecord, NodeKind, ParseStrategy, StructuralNode};

// Pipeline
pub use analyzer::{
    FileAnalyzer, TreeWalker,
    parser::{Language, Parser},
};
pub use report::{Report, aggregate};
