use serde::{Deserialize, Serialize};

use crate::analyzer::parser::Language;
use crate::types::AnalysisSet;

/// Per-language file, function and class totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub language: Language,
    pub count: usize,
    pub function_total: usize,
    pub class_total: usize,
}

impl LanguageStats {
    fn empty(language: Language) -> Self {
        Self {
            language,
            count: 0,
            function_total: 0,
            class_total: 0,
        }
    }
}

/// Group records by language, most files first.
///
/// Languages with equal counts keep the order in which they first appear.
pub fn language_stats(set: &AnalysisSet) -> Vec<LanguageStats> {
    let mut stats: Vec<LanguageStats> = Vec::new();

    for record in set {
        let index = match stats.iter().position(|s| s.language == record.language) {
            Some(index) => index,
            None => {
                stats.push(LanguageStats::empty(record.language));
                stats.len() - 1
            }
        };
        let entry = &mut stats[index];
        entry.count += 1;
        entry.function_total += record.metadata.function_names.len();
        entry.class_total += record.metadata.class_names.len();
    }

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}
