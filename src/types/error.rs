//! Unified Error Type System
//!
//! Two layers of errors:
//!
//! - **GuideError**: fatal conditions returned through `Result`. Only the
//!   root of a walk and configuration loading can fail this way.
//! - **AnalysisError**: per-file degradations. They never abort a walk;
//!   their `Display` text is stored in `FileRecord::error` instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum GuideError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Root path not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("Root path is not a directory: {}", path.display())]
    RootNotDirectory { path: PathBuf },

    #[error("Permission denied reading root path: {}", path.display())]
    RootPermissionDenied { path: PathBuf },

    #[error("Cannot read root path {}: {message}", path.display())]
    RootUnreadable { path: PathBuf, message: String },

    #[error("Malformed tree view at line {line}: {message}")]
    TreeView { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, GuideError>;

impl GuideError {
    /// Classify an I/O failure on the walk root into the matching variant
    pub fn from_root_io(path: &Path, err: &std::io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::RootNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::RootPermissionDenied { path },
            std::io::ErrorKind::NotADirectory => Self::RootNotDirectory { path },
            _ => Self::RootUnreadable {
                path,
                message: err.to_string(),
            },
        }
    }

    /// Whether this error concerns the walk root rather than configuration
    pub fn is_root_error(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound { .. }
                | Self::RootNotDirectory { .. }
                | Self::RootPermissionDenied { .. }
                | Self::RootUnreadable { .. }
        )
    }
}

// =============================================================================
// Per-File Analysis Error
// =============================================================================

/// Degradation recorded on a single file; never propagated past the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("unsupported extension: {extension}")]
    UnsupportedLanguage { extension: String },

    #[error("{message}")]
    ReadFailure { message: String },

    /// Only logged; a parse failure switches the file to pattern fallback.
    #[error("{strategy} parse failed: {message}")]
    ParseFailure { strategy: String, message: String },

    #[error("cannot read {path}: {message}")]
    WalkFailure { path: String, message: String },
}

impl AnalysisError {
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            extension: extension.into(),
        }
    }

    pub fn read(err: &std::io::Error) -> Self {
        Self::ReadFailure {
            message: err.to_string(),
        }
    }

    pub fn parse(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            strategy: strategy.into(),
            message: message.into(),
        }
    }

    pub fn walk(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WalkFailure {
            path: path.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
