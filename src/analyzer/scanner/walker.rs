//! Tree Walker
//!
//! Enumerates a root with [`FileScanner`], keeps files whose extension is in
//! the analyzer's table and runs the [`FileAnalyzer`] on each one. With
//! `walk.parallel` the per-file work runs on rayon; records come back in
//! walk order either way.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use super::file_scanner::{FileScanner, ScanEntry};
use crate::analyzer::FileAnalyzer;
use crate::analyzer::parser::Language;
use crate::config::{Config, WalkConfig};
use crate::types::{AnalysisError, AnalysisSet, FileMetadata, FileRecord, Result};

/// A unit of work for the analyzer
enum Candidate {
    File { path: PathBuf, relative: String },
    Unreadable { relative: String, message: String },
}

pub struct TreeWalker {
    walk: WalkConfig,
    analyzer: FileAnalyzer,
}

impl TreeWalker {
    pub fn new(config: &Config) -> Self {
        Self {
            walk: config.walk.clone(),
            analyzer: FileAnalyzer::new(config.analysis.clone()),
        }
    }

    /// Analyze every supported file under `root`.
    ///
    /// Fails only when `root` itself is missing, not a directory or not
    /// readable. Unreadable subdirectories become error records.
    pub fn walk(&self, root: &Path) -> Result<AnalysisSet> {
        let start = Instant::now();
        let candidates = self.candidates(root)?;

        let records: Vec<FileRecord> = if self.walk.parallel {
            candidates.par_iter().map(|c| self.analyze(c)).collect()
        } else {
            candidates.iter().map(|c| self.analyze(c)).collect()
        };

        let set: AnalysisSet = records.into_iter().collect();
        let errors = set.iter().filter(|r| r.is_error()).count();
        info!(
            "Analyzed {} files under {} ({} with errors) in {:.2?}",
            set.len(),
            root.display(),
            errors,
            start.elapsed()
        );
        Ok(set)
    }

    /// Sequential, lazy variant of [`walk`](Self::walk).
    ///
    /// Records are yielded in walk order, so stopping early leaves a valid
    /// prefix of the full Analysis Set.
    pub fn records<'a>(
        &'a self,
        root: &Path,
    ) -> Result<impl Iterator<Item = FileRecord> + use<'a>> {
        let entries = FileScanner::from_config(root, &self.walk).entries()?;
        Ok(entries
            .filter_map(move |entry| self.admit(entry))
            .map(move |candidate| self.analyze(&candidate)))
    }

    fn candidates(&self, root: &Path) -> Result<Vec<Candidate>> {
        let scanner = FileScanner::from_config(root, &self.walk);
        Ok(scanner
            .entries()?
            .filter_map(|entry| self.admit(entry))
            .collect())
    }

    /// Keep unreadable entries and files with a supported extension
    fn admit(&self, entry: ScanEntry) -> Option<Candidate> {
        match entry {
            ScanEntry::File { path, relative } => self
                .analyzer
                .is_supported(&path)
                .then_some(Candidate::File { path, relative }),
            ScanEntry::Unreadable { relative, message } => {
                warn!("Skipping unreadable entry {}: {}", relative, message);
                Some(Candidate::Unreadable { relative, message })
            }
        }
    }

    fn analyze(&self, candidate: &Candidate) -> FileRecord {
        match candidate {
            Candidate::File { path, relative } => self.analyzer.analyze_as(path, relative.clone()),
            Candidate::Unreadable { relative, message } => FileRecord::failed(
                relative.clone(),
                Language::Unknown,
                AnalysisError::walk(relative.clone(), message.clone()),
                FileMetadata::default(),
            ),
        }
    }
}
