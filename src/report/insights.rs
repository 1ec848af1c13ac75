//! Architecture insights
//!
//! Each heuristic is an independent predicate over the Analysis Set. They
//! are evaluated in a fixed order so output is stable across runs.

use std::collections::BTreeSet;
use std::fmt;

use crate::analyzer::parser::Language;
use crate::config::InsightConfig;
use crate::types::{AnalysisSet, FileRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insight {
    MultiLanguage { languages: usize },
    ComponentOriented { files: usize },
    StateManagement,
    ClientRouting,
    ApiIntegration,
    ObjectOriented,
    Functional,
    Testing,
    Configuration,
    UtilityStyling,
    TraditionalStyling,
    FeatureModules,
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::MultiLanguage { languages } => write!(
                f,
                "Multi-language project with {} different programming languages",
                languages
            ),
            Insight::ComponentOriented { files } => {
                write!(f, "React application with {} component files", files)
            }
            Insight::StateManagement => f.write_str("Uses Redux for state management"),
            Insight::ClientRouting => f.write_str("Implements client-side routing"),
            Insight::ApiIntegration => f.write_str("Includes API integration and data fetching"),
            Insight::ObjectOriented => {
                f.write_str("Object-oriented architecture with significant use of classes")
            }
            Insight::Functional => {
                f.write_str("Functional programming approach with emphasis on functions")
            }
            Insight::Testing => f.write_str("Includes test files - good testing practices"),
            Insight::Configuration => {
                f.write_str("Well-structured project with proper configuration files")
            }
            Insight::UtilityStyling => f.write_str("Uses Tailwind CSS for utility-first styling"),
            Insight::TraditionalStyling => f.write_str("Uses traditional CSS/SCSS for styling"),
            Insight::FeatureModules => {
                f.write_str("Organized by features - good modular architecture")
            }
        }
    }
}

/// A record viewed through the substring predicates.
///
/// Paths and names are matched case-sensitively; only the function-name
/// API token ignores case.
struct Probe<'a> {
    record: &'a FileRecord,
}

impl<'a> Probe<'a> {
    fn new(record: &'a FileRecord) -> Self {
        Self { record }
    }

    fn path_contains(&self, tokens: &[String]) -> bool {
        contains_any(&self.record.path, tokens)
    }

    fn path_ends_with(&self, suffixes: &[String]) -> bool {
        suffixes.iter().any(|s| self.record.path.ends_with(s.as_str()))
    }

    fn imports_contain(&self, tokens: &[String]) -> bool {
        self.record
            .metadata
            .import_names
            .iter()
            .any(|name| contains_any(name, tokens))
    }

    fn has_component_function(&self) -> bool {
        self.record
            .metadata
            .function_names
            .iter()
            .any(|name| name.chars().next().is_some_and(|c| c.is_ascii_uppercase()))
    }

    fn has_function_containing(&self, token: &str) -> bool {
        let token = token.to_lowercase();
        self.record
            .metadata
            .function_names
            .iter()
            .any(|name| name.to_lowercase().contains(&token))
    }
}

fn contains_any(haystack: &str, tokens: &[String]) -> bool {
    tokens.iter().any(|token| haystack.contains(token.as_str()))
}

/// Evaluate every heuristic in order
pub fn detect(set: &AnalysisSet, config: &InsightConfig) -> Vec<Insight> {
    let probes: Vec<Probe<'_>> = set.iter().map(Probe::new).collect();
    let mut insights = Vec::new();

    let languages: BTreeSet<Language> = set
        .iter()
        .map(|r| r.language)
        .filter(|l| l.is_known())
        .collect();
    if languages.len() > config.multi_language_threshold {
        insights.push(Insight::MultiLanguage {
            languages: languages.len(),
        });
    }

    let components = probes
        .iter()
        .filter(|p| p.has_component_function() || p.path_ends_with(&config.component_extensions))
        .count();
    if components > 0 {
        insights.push(Insight::ComponentOriented { files: components });
    }

    if probes.iter().any(|p| {
        p.path_contains(&config.state_path_tokens) || p.imports_contain(&config.state_import_tokens)
    }) {
        insights.push(Insight::StateManagement);
    }

    if probes.iter().any(|p| p.imports_contain(&config.routing_import_tokens)) {
        insights.push(Insight::ClientRouting);
    }

    if probes.iter().any(|p| {
        p.path_contains(&config.api_path_tokens)
            || p.has_function_containing(&config.api_function_token)
    }) {
        insights.push(Insight::ApiIntegration);
    }

    let function_total: usize = set.iter().map(|r| r.metadata.function_names.len()).sum();
    let class_total: usize = set.iter().map(|r| r.metadata.class_names.len()).sum();
    if class_total as f64 > function_total as f64 * config.oo_ratio {
        insights.push(Insight::ObjectOriented);
    } else if function_total as f64 > class_total as f64 * config.functional_ratio {
        insights.push(Insight::Functional);
    }

    if probes.iter().any(|p| p.path_contains(&config.test_path_tokens)) {
        insights.push(Insight::Testing);
    }

    if probes.iter().any(|p| p.path_contains(&config.config_file_tokens)) {
        insights.push(Insight::Configuration);
    }

    if probes.iter().any(|p| p.path_contains(&config.css_framework_tokens)) {
        insights.push(Insight::UtilityStyling);
    } else if probes.iter().any(|p| p.path_ends_with(&config.stylesheet_extensions)) {
        insights.push(Insight::TraditionalStyling);
    }

    if probes.iter().any(|p| p.path_contains(&config.feature_path_tokens)) {
        insights.push(Insight::FeatureModules);
    }

    insights
}

/// [`detect`] rendered as display strings
pub fn insights(set: &AnalysisSet, config: &InsightConfig) -> Vec<String> {
    detect(set, config).iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileMetadata, ParseStrategy};

    fn record(path: &str, language: Language) -> FileRecord {
        FileRecord::parsed(
            path,
            language,
            ParseStrategy::Patterns,
            vec![],
            FileMetadata::default(),
        )
    }

    fn with_names(mut record: FileRecord, functions: &[&str], classes: &[&str], imports: &[&str]) -> FileRecord {
        let to_set = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        record.metadata.function_names = to_set(functions);
        record.metadata.class_names = to_set(classes);
        record.metadata.import_names = to_set(imports);
        record
    }

    fn run(records: Vec<FileRecord>) -> Vec<Insight> {
        let set: AnalysisSet = records.into_iter().collect();
        detect(&set, &InsightConfig::default())
    }

    #[test]
    fn test_empty_set_has_no_insights() {
        assert!(run(vec![]).is_empty());
    }

    #[test]
    fn test_multi_language_needs_more_than_three() {
        let three = run(vec![
            record("a.ts", Language::TypeScript),
            record("b.py", Language::Python),
            record("c.go", Language::Go),
        ]);
        assert!(!three.iter().any(|i| matches!(i, Insight::MultiLanguage { .. })));

        let four = run(vec![
            record("a.ts", Language::TypeScript),
            record("b.py", Language::Python),
            record("c.go", Language::Go),
            record("d.rs", Language::Rust),
        ]);
        assert_eq!(four[0], Insight::MultiLanguage { languages: 4 });
        assert_eq!(
            four[0].to_string(),
            "Multi-language project with 4 different programming languages"
        );
    }

    #[test]
    fn test_component_count() {
        let insights = run(vec![
            with_names(record("src/App.ts", Language::TypeScript), &["App"], &[], &[]),
            record("src/Button.jsx", Language::JavaScript),
            with_names(record("src/util.ts", Language::TypeScript), &["helper"], &[], &[]),
        ]);
        assert!(insights.contains(&Insight::ComponentOriented { files: 2 }));
    }

    #[test]
    fn test_state_routing_and_api() {
        let insights = run(vec![with_names(
            record("src/main.ts", Language::TypeScript),
            &["fetchUsers"],
            &[],
            &["@reduxjs/toolkit", "react-router-dom"],
        )]);
        assert!(insights.contains(&Insight::StateManagement));
        assert!(insights.contains(&Insight::ClientRouting));
        assert!(insights.contains(&Insight::ApiIntegration));

        let by_path = run(vec![record("src/store/userSlice.ts", Language::TypeScript)]);
        assert!(by_path.contains(&Insight::StateManagement));
        assert!(!by_path.contains(&Insight::ClientRouting));
    }

    #[test]
    fn test_paradigm_is_exclusive() {
        let oo = run(vec![with_names(
            record("a.java", Language::Java),
            &["run", "stop"],
            &["Engine", "Wheel"],
            &[],
        )]);
        assert!(oo.contains(&Insight::ObjectOriented));
        assert!(!oo.contains(&Insight::Functional));

        let functional = run(vec![with_names(
            record("a.go", Language::Go),
            &["a", "b", "c", "d"],
            &["T"],
            &[],
        )]);
        assert!(functional.contains(&Insight::Functional));
        assert!(!functional.contains(&Insight::ObjectOriented));
    }

    #[test]
    fn test_tailwind_wins_over_plain_css() {
        let insights = run(vec![
            record("tailwind.config.js", Language::JavaScript),
            record("src/app.css", Language::Unknown),
        ]);
        assert!(insights.contains(&Insight::UtilityStyling));
        assert!(insights.contains(&Insight::Configuration));
        assert!(!insights.contains(&Insight::TraditionalStyling));

        let plain = run(vec![record("src/app.scss", Language::Unknown)]);
        assert!(plain.contains(&Insight::TraditionalStyling));
    }

    #[test]
    fn test_testing_and_features() {
        let insights = run(vec![
            record("src/features/cart/Cart.spec.ts", Language::TypeScript),
        ]);
        assert!(insights.contains(&Insight::Testing));
        assert!(insights.contains(&Insight::FeatureModules));
    }

    #[test]
    fn test_output_order_is_fixed() {
        let strings = insights(
            &vec![with_names(
                record("src/api/client.test.ts", Language::TypeScript),
                &["fetchAll", "parse", "send", "retry"],
                &[],
                &[],
            )]
            .into_iter()
            .collect(),
            &InsightConfig::default(),
        );
        assert_eq!(
            strings,
            vec![
                "Includes API integration and data fetching",
                "Functional programming approach with emphasis on functions",
                "Includes test files - good testing practices",
            ]
        );
    }

    #[test]
    fn test_path_tokens_are_case_sensitive() {
        let insights = run(vec![
            record("src/Features/Cart.ts", Language::TypeScript),
            record("src/MyTest.ts", Language::TypeScript),
            record("src/Store.ts", Language::TypeScript),
        ]);
        assert!(!insights.contains(&Insight::FeatureModules));
        assert!(!insights.contains(&Insight::Testing));
        assert!(!insights.contains(&Insight::StateManagement));

        let manifest = run(vec![record("Cargo.toml", Language::Unknown)]);
        assert!(manifest.contains(&Insight::Configuration));
    }

    #[test]
    fn test_fetch_token_ignores_case() {
        let insights = run(vec![with_names(
            record("src/users.ts", Language::TypeScript),
            &["loadAndFETCH"],
            &[],
            &[],
        )]);
        assert!(insights.contains(&Insight::ApiIntegration));
    }
}
