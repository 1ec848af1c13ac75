//! Language Detection Module
//!
//! **Single source of truth** for language detection. The extension table
//! here seeds `AnalysisConfig::supported_extensions`; the walker and the
//! analyzer both resolve languages through that table.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use repoguide::analyzer::parser::Language;
//!
//! let lang = Language::from_path("src/main.rs");
//! assert_eq!(lang, Language::Rust);
//! assert_eq!(lang.as_str(), "rust");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Language Metadata Table - Single Source of Truth
// =============================================================================

/// Language metadata entry containing all language-specific information
struct LanguageMeta {
    /// Display name (human-readable)
    display_name: &'static str,
    /// Stable lowercase identifier used in records and stats
    id: &'static str,
    /// File extensions (without the dot) that map to this language
    extensions: &'static [&'static str],
    /// Prefixes that start a line comment or a block comment
    comment_markers: &'static [&'static str],
    /// Whether a real grammar parse is attempted before pattern fallback
    has_parser: bool,
}

/// Macro to define language metadata concisely
macro_rules! lang_meta {
    ($display:literal, $id:literal, [$($ext:literal),*], [$($marker:literal),*], $parser:literal) => {
        LanguageMeta {
            display_name: $display,
            id: $id,
            extensions: &[$($ext),*],
            comment_markers: &[$($marker),*],
            has_parser: $parser,
        }
    };
}

impl Language {
    /// Get metadata for this language variant
    fn meta(&self) -> LanguageMeta {
        match self {
            Language::JavaScript => lang_meta!("JavaScript", "javascript", ["js", "jsx"], ["//", "/*"], true),
            Language::TypeScript => lang_meta!("TypeScript", "typescript", ["ts", "tsx"], ["//", "/*"], true),
            Language::Python => lang_meta!("Python", "python", ["py"], ["#"], true),
            Language::Java => lang_meta!("Java", "java", ["java"], ["//", "/*"], false),
            Language::Go => lang_meta!("Go", "go", ["go"], ["//", "/*"], false),
            Language::Rust => lang_meta!("Rust", "rust", ["rs"], ["//", "/*"], false),
            Language::Cpp => lang_meta!("C++", "cpp", ["cpp"], ["//", "/*"], false),
            Language::C => lang_meta!("C", "c", ["c"], ["//", "/*"], false),
            Language::CSharp => lang_meta!("C#", "csharp", ["cs"], ["//", "/*"], false),
            Language::Php => lang_meta!("PHP", "php", ["php"], ["//", "#", "/*"], false),
            Language::Ruby => lang_meta!("Ruby", "ruby", ["rb"], ["#", "=begin"], false),
            Language::Unknown => lang_meta!("Unknown", "unknown", [], [], false),
        }
    }
}

// =============================================================================
// Language Enum Definition
// =============================================================================

/// Languages recognised by the analyzer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Go,
    Rust,
    Cpp,
    C,
    CSharp,
    Php,
    Ruby,
    #[default]
    Unknown,
}

// =============================================================================
// Language Methods (using metadata table)
// =============================================================================

impl Language {
    /// Stable lowercase identifier (`"typescript"`, `"cpp"`, ...)
    pub fn as_str(&self) -> &'static str {
        self.meta().id
    }

    /// Display name (human-readable)
    pub fn display_name(&self) -> &'static str {
        self.meta().display_name
    }

    /// Line prefixes the pattern fallback treats as comments
    pub fn comment_markers(&self) -> &'static [&'static str] {
        self.meta().comment_markers
    }

    /// Detect language from file extension (with or without leading dot)
    pub fn from_extension(ext: &str) -> Self {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();

        for lang in Self::all_variants() {
            let meta = lang.meta();
            if meta.extensions.iter().any(|e| *e == ext_lower) {
                return *lang;
            }
        }

        Language::Unknown
    }

    /// Detect language from file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Check if this is a known language (not Unknown)
    pub fn is_known(&self) -> bool {
        !matches!(self, Language::Unknown)
    }

    /// Check if this language attempts a grammar parse before pattern fallback
    pub fn has_parser_support(&self) -> bool {
        self.meta().has_parser
    }

    /// Default `.ext -> language` table, keys include the leading dot
    pub fn default_extension_table() -> BTreeMap<String, Language> {
        Self::all_variants()
            .iter()
            .flat_map(|lang| {
                lang.meta()
                    .extensions
                    .iter()
                    .map(move |ext| (format!(".{}", ext), *lang))
            })
            .collect()
    }

    /// All known variants (Unknown excluded)
    pub fn all_variants() -> &'static [Language] {
        &[
            Language::JavaScript,
            Language::TypeScript,
            Language::Python,
            Language::Java,
            Language::Go,
            Language::Rust,
            Language::Cpp,
            Language::C,
            Language::CSharp,
            Language::Php,
            Language::Ruby,
        ]
    }
}

/// Lowercased extension of a path including the leading dot (`".ts"`)
pub fn dotted_extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.to_lowercase();

        for lang in Self::all_variants() {
            let meta = lang.meta();
            if meta.id == s_lower || meta.display_name.to_lowercase() == s_lower {
                return Ok(*lang);
            }
        }

        if s_lower.is_empty() || s_lower == "unknown" {
            return Ok(Language::Unknown);
        }

        Err(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("rs"), Language::Rust);
        assert_eq!(Language::from_extension(".RS"), Language::Rust);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("tsx"), Language::TypeScript);
        assert_eq!(Language::from_extension("jsx"), Language::JavaScript);
        assert_eq!(Language::from_extension("cs"), Language::CSharp);
        assert_eq!(Language::from_extension("unknown"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("src/main.rs"), Language::Rust);
        assert_eq!(Language::from_path("test.py"), Language::Python);
        assert_eq!(Language::from_path("no_extension"), Language::Unknown);
        assert_eq!(Language::from_path("Component.tsx"), Language::TypeScript);
    }

    #[test]
    fn test_default_extension_table() {
        let table = Language::default_extension_table();
        assert_eq!(table.len(), 13);
        assert_eq!(table.get(".ts"), Some(&Language::TypeScript));
        assert_eq!(table.get(".jsx"), Some(&Language::JavaScript));
        assert_eq!(table.get(".rb"), Some(&Language::Ruby));
        assert!(!table.contains_key(".h"));
    }

    #[test]
    fn test_dotted_extension() {
        assert_eq!(dotted_extension("a/b/App.TSX").as_deref(), Some(".tsx"));
        assert_eq!(dotted_extension("Makefile"), None);
    }

    #[test]
    fn test_display_and_id() {
        assert_eq!(format!("{}", Language::Cpp), "C++");
        assert_eq!(Language::Cpp.as_str(), "cpp");
        assert_eq!(Language::CSharp.as_str(), "csharp");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("rust".parse::<Language>(), Ok(Language::Rust));
        assert_eq!("C++".parse::<Language>(), Ok(Language::Cpp));
        assert_eq!("csharp".parse::<Language>(), Ok(Language::CSharp));
        assert_eq!("invalid_lang_xyz".parse::<Language>(), Err(()));
    }

    #[test]
    fn test_comment_markers() {
        assert!(Language::Python.comment_markers().contains(&"#"));
        assert!(!Language::C.comment_markers().contains(&"#"));
        assert!(Language::Php.comment_markers().contains(&"#"));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Language::TypeScript).unwrap();
        assert_eq!(json, "\"typescript\"");
        let parsed: Language = serde_json::from_str("\"csharp\"").unwrap();
        assert_eq!(parsed, Language::CSharp);
    }

    #[test]
    fn test_metadata_consistency() {
        for lang in Language::all_variants() {
            let meta = lang.meta();
            assert!(!meta.display_name.is_empty(), "Empty display name for {:?}", lang);
            assert!(!meta.extensions.is_empty(), "No extensions for {:?}", lang);
            assert_eq!(lang.as_str(), format!("{:?}", lang).to_lowercase());
        }
    }
}
