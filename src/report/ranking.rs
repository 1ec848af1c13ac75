use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::types::{AnalysisSet, FileRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub path: String,
    pub score: u32,
}

/// Heuristic importance of one file.
///
/// Entry-point names, a moderate size and many functions, classes and
/// imports all raise the score. Import credit is capped.
pub fn importance_score(record: &FileRecord, scoring: &ScoringConfig) -> u32 {
    let meta = &record.metadata;
    let mut score = 0u32;

    let file_name = record.file_name().to_lowercase();
    if scoring
        .entry_point_hints
        .iter()
        .any(|hint| file_name.contains(&hint.to_lowercase()))
    {
        score = score.saturating_add(scoring.entry_point_bonus);
    }

    if meta.line_count > scoring.size_window_min && meta.line_count < scoring.size_window_max {
        score = score.saturating_add(scoring.size_bonus);
    }

    score = score
        .saturating_add(weighted(meta.function_names.len(), scoring.function_weight))
        .saturating_add(weighted(meta.class_names.len(), scoring.class_weight))
        .saturating_add(
            weighted(meta.import_names.len(), scoring.import_weight).min(scoring.import_cap),
        );

    score
}

fn weighted(count: usize, weight: u32) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX).saturating_mul(weight)
}

/// Every record with its score, highest first; ties keep set order
pub fn rank(set: &AnalysisSet, scoring: &ScoringConfig) -> Vec<KeyFile> {
    let mut ranked: Vec<KeyFile> = set
        .iter()
        .map(|record| KeyFile {
            path: record.path.clone(),
            score: importance_score(record, scoring),
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// The top `key_file_limit` entries of [`rank`]
pub fn key_files(set: &AnalysisSet, scoring: &ScoringConfig) -> Vec<KeyFile> {
    let mut ranked = rank(set, scoring);
    ranked.truncate(scoring.key_file_limit);
    ranked
}
