//! Language Parser Module
//!
//! Parse strategies per language:
//!
//! - **Grammar**: tree-sitter JavaScript / TypeScript
//! - **Interpreter**: Python through the host `ast` module
//! - **Patterns**: line-based regex catalog, the fallback for everything
//!
//! ## Parser Factory
//!
//! ```rust,ignore
//! use repoguide::analyzer::parser::{Language, create_parser};
//!
//! if let Some(parser) = create_parser(Language::TypeScript, &config.analysis) {
//!     let nodes = parser.parse("index.ts", content)?;
//! }
//! ```

pub mod language;
pub mod patterns;
pub mod python;
pub mod traits;
pub mod tree;
pub mod typescript;

pub use language::{Language, dotted_extension};
pub use patterns::{PatternCatalog, PatternParser, truncate_snippet};
pub use python::PythonParser;
pub use traits::{Parser, create_ts_parser, get_node_text, node_span};
pub use tree::{TreeNode, clean_tree};
pub use typescript::TypeScriptParser;

use crate::config::AnalysisConfig;

/// Create the primary (non-fallback) parser for a language.
///
/// Returns `None` when the language goes straight to the pattern catalog,
/// including Python with the interpreter strategy disabled.
pub fn create_parser(language: Language, config: &AnalysisConfig) -> Option<Box<dyn Parser>> {
    match language {
        Language::JavaScript | Language::TypeScript => {
            Some(Box::new(
                TypeScriptParser::new(language).with_max_depth(config.max_tree_depth),
            ))
        }
        Language::Python if config.interpreter.enabled => {
            Some(Box::new(PythonParser::new(&config.interpreter)))
        }
        Language::Python
        | Language::Java
        | Language::Go
        | Language::Rust
        | Language::Cpp
        | Language::C
        | Language::CSharp
        | Language::Php
        | Language::Ruby
        | Language::Unknown => None,
    }
}

/// Pattern fallback for a language, honouring the configured snippet width
pub fn create_fallback_parser(language: Language, config: &AnalysisConfig) -> PatternParser {
    PatternParser::new(language).with_snippet_max_chars(config.snippet_max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParseStrategy;

    #[test]
    fn test_create_parser_grammar_languages() {
        let config = AnalysisConfig::default();
        let parser = create_parser(Language::TypeScript, &config).unwrap();
        assert_eq!(parser.language(), Language::TypeScript);
        assert_eq!(parser.strategy(), ParseStrategy::Grammar);

        let parser = create_parser(Language::JavaScript, &config).unwrap();
        assert_eq!(parser.language(), Language::JavaScript);
    }

    #[test]
    fn test_create_parser_python_respects_config() {
        let mut config = AnalysisConfig::default();
        let parser = create_parser(Language::Python, &config).unwrap();
        assert_eq!(parser.strategy(), ParseStrategy::Interpreter);

        config.interpreter.enabled = false;
        assert!(create_parser(Language::Python, &config).is_none());
    }

    #[test]
    fn test_pattern_only_languages() {
        let config = AnalysisConfig::default();
        for lang in [Language::Go, Language::Rust, Language::Ruby, Language::Unknown] {
            assert!(create_parser(lang, &config).is_none(), "{:?}", lang);
        }
        for lang in Language::all_variants() {
            assert_eq!(
                create_parser(*lang, &config).is_some(),
                lang.has_parser_support(),
                "{:?}",
                lang
            );
        }
    }

    #[test]
    fn test_fallback_parser_snippet_width() {
        let mut config = AnalysisConfig::default();
        config.snippet_max_chars = 5;
        let parser = create_fallback_parser(Language::Go, &config);
        let nodes = parser.extract("func main() {}");
        assert_eq!(nodes[0].content.as_deref(), Some("func ..."));
        assert_eq!(parser.strategy(), ParseStrategy::Patterns);
    }
}
