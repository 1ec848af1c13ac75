//! Report aggregation
//!
//! Turns an [`AnalysisSet`] into a [`Report`]: language statistics, ranked
//! key files, the directory tree and its rendering, and architecture
//! insights. Everything is recomputed from the set; nothing is cached.

pub mod insights;
pub mod ranking;
pub mod stats;
pub mod tree_view;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analyzer::parser::Language;
use crate::config::Config;
use crate::types::{AnalysisSet, FileRecord};

pub use insights::{Insight, detect};
pub use ranking::{KeyFile, importance_score, key_files, rank};
pub use stats::{LanguageStats, language_stats};
pub use tree_view::{DirectoryTree, TreeEntry, parse_tree_view};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub files: AnalysisSet,
    pub language_stats: Vec<LanguageStats>,
    pub key_files: Vec<KeyFile>,
    pub tree: DirectoryTree,
    pub tree_view: String,
    pub insights: Vec<String>,
}

impl Report {
    pub fn total_functions(&self) -> usize {
        self.language_stats.iter().map(|s| s.function_total).sum()
    }

    pub fn total_classes(&self) -> usize {
        self.language_stats.iter().map(|s| s.class_total).sum()
    }

    /// Records grouped per language, each group in set order
    pub fn files_by_language(&self) -> BTreeMap<Language, Vec<&FileRecord>> {
        let mut grouped: BTreeMap<Language, Vec<&FileRecord>> = BTreeMap::new();
        for record in &self.files {
            grouped.entry(record.language).or_default().push(record);
        }
        grouped
    }

    /// Key files resolved back to their records
    pub fn key_file_records(&self) -> impl Iterator<Item = (&KeyFile, &FileRecord)> {
        self.key_files
            .iter()
            .filter_map(|key| self.files.get(&key.path).map(|record| (key, record)))
    }
}

/// Build a [`Report`] from one walk's records
pub fn aggregate(files: AnalysisSet, config: &Config) -> Report {
    let language_stats = language_stats(&files);
    let key_files = key_files(&files, &config.scoring);

    let mut paths: Vec<&str> = files.iter().map(|r| r.path.as_str()).collect();
    paths.sort_unstable();
    let tree = DirectoryTree::from_paths(paths);
    let tree_view = tree.render();

    let insights = insights::insights(&files, &config.insights);

    info!(
        "Aggregated {} files: {} languages, {} key files, {} insights",
        files.len(),
        language_stats.len(),
        key_files.len(),
        insights.len()
    );

    Report {
        files,
        language_stats,
        key_files,
        tree,
        tree_view,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileMetadata, ParseStrategy};

    fn record(path: &str, language: Language, functions: &[&str]) -> FileRecord {
        let metadata = FileMetadata {
            line_count: 10,
            function_names: functions.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let mut record = FileRecord::parsed(path, language, ParseStrategy::Patterns, vec![], FileMetadata::default());
        record.metadata = metadata;
        record
    }

    fn sample() -> AnalysisSet {
        vec![
            record("src/util.py", Language::Python, &["helper"]),
            record("src/index.ts", Language::TypeScript, &["main", "boot"]),
            record("src/app/view.ts", Language::TypeScript, &[]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_aggregate_sections() {
        let report = aggregate(sample(), &Config::default());

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.language_stats[0].language, Language::TypeScript);
        assert_eq!(report.language_stats[0].count, 2);
        assert_eq!(report.total_functions(), 3);
        assert_eq!(report.total_classes(), 0);
        assert_eq!(report.key_files[0].path, "src/index.ts");
        assert_eq!(
            report.tree.file_paths(),
            vec!["src/app/view.ts", "src/index.ts", "src/util.py"]
        );
        assert_eq!(parse_tree_view(&report.tree_view).unwrap(), report.tree);
        assert!(report
            .insights
            .contains(&"Functional programming approach with emphasis on functions".to_string()));
    }

    #[test]
    fn test_files_by_language() {
        let report = aggregate(sample(), &Config::default());
        let grouped = report.files_by_language();
        let ts: Vec<&str> = grouped[&Language::TypeScript]
            .iter()
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(ts, vec!["src/index.ts", "src/app/view.ts"]);
        assert_eq!(grouped[&Language::Python].len(), 1);
    }

    #[test]
    fn test_key_file_records_resolve() {
        let report = aggregate(sample(), &Config::default());
        let resolved: Vec<_> = report.key_file_records().collect();
        assert_eq!(resolved.len(), report.key_files.len());
        assert_eq!(resolved[0].1.path, resolved[0].0.path);
    }

    #[test]
    fn test_report_json_keeps_records() {
        let report = aggregate(sample(), &Config::default());
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.files, report.files);
        assert_eq!(back.key_files, report.key_files);
        assert_eq!(back.insights, report.insights);
    }
}
