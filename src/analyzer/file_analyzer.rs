//! File Analyzer
//!
//! `analyze` is total: every failure mode is recorded in the returned
//! `FileRecord` rather than propagated.
//!
//! Pipeline per file:
//! 1. extension → language through the configured table
//! 2. bounded read (lossy UTF-8)
//! 3. primary strategy (grammar / interpreter) when the language has one
//! 4. pattern catalog fallback on failure or for every other language
//! 5. metadata from top-level nodes plus raw line / byte counts

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::parser::{Language, create_fallback_parser, create_parser, dotted_extension};
use crate::config::AnalysisConfig;
use crate::types::{AnalysisError, FileMetadata, FileRecord, ParseStrategy};

pub struct FileAnalyzer {
    config: AnalysisConfig,
}

impl FileAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Language for a path, `None` when its extension is not in the table
    pub fn language_of(&self, path: &Path) -> Option<Language> {
        dotted_extension(path).and_then(|ext| self.config.language_for(&ext))
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.language_of(path).is_some()
    }

    /// Analyze a file, identifying the record by the path as given
    pub fn analyze(&self, path: &Path) -> FileRecord {
        self.analyze_as(path, path.to_string_lossy().into_owned())
    }

    /// Analyze a file, identifying the record by `record_path`
    pub fn analyze_as(&self, path: &Path, record_path: String) -> FileRecord {
        let Some(language) = self.language_of(path) else {
            let extension = dotted_extension(path).unwrap_or_else(|| "(none)".to_string());
            debug!("{}: unsupported extension {}", record_path, extension);
            return FileRecord::failed(
                record_path,
                Language::Unknown,
                AnalysisError::unsupported(extension),
                self.raw_metadata(path),
            );
        };

        let bytes = match self.read_bounded(path) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!("{}: {}", record_path, error);
                return FileRecord::failed(record_path, language, error, stat_metadata(path));
            }
        };

        let content = String::from_utf8_lossy(&bytes);
        self.analyze_content(record_path, language, &content, bytes.len() as u64)
    }

    /// Analyze in-memory content already attributed to `language`
    pub fn analyze_content(
        &self,
        record_path: String,
        language: Language,
        content: &str,
        byte_size: u64,
    ) -> FileRecord {
        let metadata = FileMetadata::from_content(content, byte_size);

        if let Some(parser) = create_parser(language, &self.config) {
            match parser.parse(&record_path, content) {
                Ok(nodes) => {
                    debug!(
                        "{}: {} strategy produced {} nodes",
                        record_path,
                        parser.strategy(),
                        nodes.len()
                    );
                    return FileRecord::parsed(
                        record_path,
                        language,
                        parser.strategy(),
                        nodes,
                        metadata,
                    );
                }
                Err(e) => debug!("{}: {}; falling back to patterns", record_path, e),
            }
        }

        let nodes = create_fallback_parser(language, &self.config).extract(content);
        FileRecord::parsed(
            record_path,
            language,
            ParseStrategy::Patterns,
            nodes,
            metadata,
        )
    }

    /// Read the whole file unless it exceeds the configured size limit
    fn read_bounded(&self, path: &Path) -> Result<Vec<u8>, AnalysisError> {
        let size = fs::metadata(path).map_err(|e| AnalysisError::read(&e))?.len();
        if size > self.config.max_file_bytes {
            return Err(AnalysisError::ReadFailure {
                message: format!(
                    "file too large: {} bytes exceeds limit of {} bytes",
                    size, self.config.max_file_bytes
                ),
            });
        }
        fs::read(path).map_err(|e| AnalysisError::read(&e))
    }

    /// Line and byte counts for files no strategy is run on
    fn raw_metadata(&self, path: &Path) -> FileMetadata {
        match self.read_bounded(path) {
            Ok(bytes) => {
                FileMetadata::from_content(&String::from_utf8_lossy(&bytes), bytes.len() as u64)
            }
            Err(_) => stat_metadata(path),
        }
    }
}

/// Byte size from `stat`; zeros when even that fails
fn stat_metadata(path: &Path) -> FileMetadata {
    FileMetadata {
        line_count: 0,
        byte_size: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;
    use tempfile::TempDir;

    fn analyzer() -> FileAnalyzer {
        let mut config = AnalysisConfig::default();
        config.interpreter.enabled = false;
        FileAnalyzer::new(config)
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.xyz");
        fs::write(&path, "a\nb\nc").unwrap();

        let record = analyzer().analyze(&path);
        assert_eq!(record.language, Language::Unknown);
        assert!(record.syntax_body.is_none());
        assert_eq!(record.error.as_deref(), Some("unsupported extension: .xyz"));
        assert_eq!(record.metadata.line_count, 3);
        assert_eq!(record.metadata.byte_size, 5);
        assert!(record.metadata.function_names.is_empty());
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.ts");

        let record = analyzer().analyze(&path);
        assert_eq!(record.language, Language::TypeScript);
        assert!(record.syntax_body.is_none());
        assert!(record.error.as_deref().unwrap().contains("os error"));
        assert_eq!(record.metadata.line_count, 0);
        assert_eq!(record.metadata.byte_size, 0);
    }

    #[test]
    fn test_oversized_file_is_read_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.go");
        fs::write(&path, "func main() {}\n".repeat(10)).unwrap();

        let mut config = AnalysisConfig::default();
        config.max_file_bytes = 16;
        let record = FileAnalyzer::new(config).analyze(&path);
        assert!(record.error.as_deref().unwrap().contains("file too large"));
        assert_eq!(record.metadata.byte_size, 150);
    }

    #[test]
    fn test_typescript_grammar_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.ts");
        fs::write(
            &path,
            "import { helper } from './util';\nexport function main() { return helper(); }\n",
        )
        .unwrap();

        let record = analyzer().analyze(&path);
        assert_eq!(record.strategy, Some(ParseStrategy::Grammar));
        assert!(record.error.is_none());
        assert!(record.metadata.function_names.contains("main"));
        assert!(record.metadata.import_names.contains("./util"));
        assert_eq!(record.metadata.line_count, 3);
    }

    #[test]
    fn test_broken_typescript_falls_back_to_patterns() {
        let content = "import React from 'react';\nexport const App = () => {\n  const [a] = useState(0);\n  return <div>{{{</div>\n";
        let record = analyzer().analyze_content(
            "App.tsx".to_string(),
            Language::TypeScript,
            content,
            content.len() as u64,
        );
        assert_eq!(record.strategy, Some(ParseStrategy::Patterns));
        let body = record.syntax_body.as_ref().unwrap();
        assert!(body.iter().any(|n| n.kind == NodeKind::Hook && n.name == "useState"));
        assert!(record.metadata.function_names.contains("App"));
        assert!(record.metadata.import_names.contains("react"));
        assert!(record.error.is_none());
    }

    #[test]
    fn test_python_uses_patterns_when_interpreter_disabled() {
        let content = "import os\n\nclass Repo:\n    def load(self):\n        pass\n";
        let record = analyzer().analyze_content(
            "repo.py".to_string(),
            Language::Python,
            content,
            content.len() as u64,
        );
        assert_eq!(record.strategy, Some(ParseStrategy::Patterns));
        assert!(record.metadata.class_names.contains("Repo"));
        assert!(record.metadata.function_names.contains("load"));
        assert!(record.metadata.import_names.contains("os"));
    }

    #[test]
    fn test_python_falls_back_when_interpreter_missing() {
        let mut config = AnalysisConfig::default();
        config.interpreter.python = "repoguide-no-such-interpreter".to_string();
        let content = "def main():\n    pass\n";
        let record = FileAnalyzer::new(config).analyze_content(
            "main.py".to_string(),
            Language::Python,
            content,
            content.len() as u64,
        );
        assert_eq!(record.strategy, Some(ParseStrategy::Patterns));
        assert!(record.metadata.function_names.contains("main"));
    }

    #[test]
    fn test_custom_extension_table() {
        let mut config = AnalysisConfig::default();
        config.interpreter.enabled = false;
        config
            .supported_extensions
            .insert(".mjs".to_string(), Language::JavaScript);
        let analyzer = FileAnalyzer::new(config);
        assert_eq!(
            analyzer.language_of(Path::new("lib/x.mjs")),
            Some(Language::JavaScript)
        );
        assert!(!analyzer.is_supported(Path::new("lib/x.h")));
    }

    #[test]
    fn test_deeply_nested_script_falls_back_to_patterns() {
        let content = format!(
            "export function outer() {{}}\nconst x = {}1{};\n",
            "[".repeat(2000),
            "]".repeat(2000)
        );
        let record = analyzer().analyze_content(
            "deep.js".to_string(),
            Language::JavaScript,
            &content,
            content.len() as u64,
        );
        assert_eq!(record.strategy, Some(ParseStrategy::Patterns));
        assert!(record.error.is_none());
        assert!(record.metadata.function_names.contains("outer"));
    }
}
