//! Code Analyzer Module
//!
//! - Per-file structural analysis with grammar, interpreter and pattern strategies
//! - Deterministic directory walking into an Analysis Set

pub mod file_analyzer;
pub mod parser;
pub mod scanner;

pub use file_analyzer::FileAnalyzer;
pub use scanner::{FileScanner, TreeWalker};
