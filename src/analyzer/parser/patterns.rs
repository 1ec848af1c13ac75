//! Pattern Catalog
//!
//! Per-language ordered `(regex, kind)` rules used when no grammar parse is
//! available or the grammar parse failed. Rules are declared as const tables
//! and compiled once per language on first use.
//!
//! Extraction is line based:
//! - blank lines and lines starting with a comment marker are skipped
//! - every rule is tested against the trimmed line, in table order
//! - a match emits a node named after capture group 1 (or `anonymous`)
//! - `(kind, name)` pairs are unique per file; the first match wins

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{Language, Parser};
use crate::constants::analysis::SNIPPET_MAX_CHARS;
use crate::types::{AnalysisError, NodeFamily, NodeKind, ParseStrategy, StructuralNode};

/// Statement keywords the loose C-family function rules can capture
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "switch", "return", "sizeof", "catch", "do", "new", "delete",
];

// =============================================================================
// Rule Tables
// =============================================================================

/// Declarative rule: a regex source and the kind it produces
struct RuleDef {
    pattern: &'static str,
    kind: NodeKind,
}

macro_rules! rules {
    ($($pattern:literal => $kind:ident),* $(,)?) => {
        &[$(RuleDef { pattern: $pattern, kind: NodeKind::$kind }),*]
    };
}

/// Modern JavaScript / React
const JAVASCRIPT_RULES: &[RuleDef] = rules![
    r"^(?:export\s+(?:default\s+)?)?(?:const|let|var)\s+([A-Z][\w$]*)\s*=\s*\(" => FunctionComponent,
    r"^(?:export\s+(?:default\s+)?)?function\s+([A-Z][\w$]*)" => FunctionComponent,
    r"^(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\*?\s*([a-z_][\w$]*)" => FunctionDeclaration,
    r"^(?:export\s+(?:default\s+)?)?const\s+([a-z_][\w$]*)\s*=\s*\(" => ArrowFunction,
    r"^(?:export\s+(?:default\s+)?)?const\s+([a-z_][\w$]*)\s*=\s*async\s*\(" => AsyncArrowFunction,
    r"^(?:export\s+(?:default\s+)?)?(?:abstract\s+)?class\s+([\w$]+)" => ClassDeclaration,
    r#"^import\s+.*?from\s+['"]([^'"]+)['"]"# => ImportDeclaration,
    r#"^import\s+['"]([^'"]+)['"]"# => ImportDeclaration,
    r"^export\s+\{([^}]+)\}" => NamedExport,
    r"^export\s+(?:default\s+)?" => ExportDeclaration,
    r"\b(use[A-Z][\w$]*)\s*\(" => Hook,
    r"createSlice\s*\(" => ReduxSlice,
    r"configureStore\s*\(" => ReduxStore,
];

/// TypeScript-only declarations, appended after the JavaScript rules
const TYPESCRIPT_EXTRA_RULES: &[RuleDef] = rules![
    r"^(?:export\s+(?:default\s+)?)?interface\s+([\w$]+)" => InterfaceDeclaration,
    r"^(?:export\s+)?type\s+([\w$]+)\s*(?:<[^=]*>)?\s*=" => TypeAlias,
    r"^(?:export\s+)?(?:const\s+)?enum\s+([\w$]+)" => EnumDeclaration,
    r"^(?:export\s+)?(?:declare\s+)?namespace\s+([\w$.]+)" => NamespaceDeclaration,
];

const PYTHON_RULES: &[RuleDef] = rules![
    r"^(?:async\s+)?def\s+([\w_]+)" => FunctionDef,
    r"^class\s+([\w_]+)" => ClassDef,
    r"^import\s+([\w_.]+)" => Import,
    r"^from\s+([\w_.]+)\s+import" => ImportFrom,
];

const JAVA_RULES: &[RuleDef] = rules![
    r"^(?:public\s+|protected\s+|private\s+)?(?:abstract\s+|final\s+|static\s+)*class\s+([\w$]+)" => ClassDeclaration,
    r"^(?:public\s+|protected\s+|private\s+)?interface\s+([\w$]+)" => InterfaceDeclaration,
    r"^(?:public\s+|protected\s+|private\s+)?enum\s+([\w$]+)" => EnumDeclaration,
    r"^public\s+.*\s+([\w$]+)\s*\(" => MethodDeclaration,
    r"^protected\s+.*\s+([\w$]+)\s*\(" => MethodDeclaration,
    r"^private\s+.*\s+([\w$]+)\s*\(" => MethodDeclaration,
    r"^import\s+(?:static\s+)?([\w$.]+)" => ImportDeclaration,
];

const GO_RULES: &[RuleDef] = rules![
    r"^func\s+([\w_]+)" => FunctionDeclaration,
    r"^func\s+\([^)]*\)\s*([\w_]+)" => MethodDeclaration,
    r"^type\s+([\w_]+)\s+struct" => StructDeclaration,
    r"^type\s+([\w_]+)\s+interface" => InterfaceDeclaration,
    r#"^import\s+(?:[\w.]+\s+)?['"]([^'"]+)"# => ImportDeclaration,
];

const RUST_RULES: &[RuleDef] = rules![
    r"^(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?fn\s+([\w_]+)" => FunctionDeclaration,
    r"^(?:pub(?:\([^)]*\))?\s+)?struct\s+([\w_]+)" => StructDeclaration,
    r"^(?:pub(?:\([^)]*\))?\s+)?enum\s+([\w_]+)" => EnumDeclaration,
    r"^(?:pub(?:\([^)]*\))?\s+)?(?:unsafe\s+)?trait\s+([\w_]+)" => TraitDeclaration,
    r"^(?:unsafe\s+)?impl(?:<[^>]*>)?\s+([\w_]+)" => ImplDeclaration,
    r"^(?:pub(?:\([^)]*\))?\s+)?mod\s+([\w_]+)" => ModuleDeclaration,
    r"^(?:pub(?:\([^)]*\))?\s+)?use\s+([\w_:]+)" => UseDeclaration,
];

const C_RULES: &[RuleDef] = rules![
    r#"^#\s*include\s*[<"]([^>"]+)[>"]"# => ImportDeclaration,
    r"^(?:typedef\s+)?struct\s+([\w_]+)" => StructDeclaration,
    r"^(?:typedef\s+)?enum\s+([\w_]+)" => EnumDeclaration,
    r"^(?:static\s+|extern\s+|inline\s+)*[\w_]+(?:\s+[\w_]+)*[\s*]+([\w_]+)\s*\([^;]*$" => FunctionDeclaration,
];

const CPP_RULES: &[RuleDef] = rules![
    r#"^#\s*include\s*[<"]([^>"]+)[>"]"# => ImportDeclaration,
    r"^(?:template\s*<[^>]*>\s*)?class\s+([\w_]+)" => ClassDeclaration,
    r"^(?:template\s*<[^>]*>\s*)?struct\s+([\w_]+)" => StructDeclaration,
    r"^namespace\s+([\w_:]+)" => NamespaceDeclaration,
    r"^using\s+namespace\s+([\w_:]+)" => UseDeclaration,
    r"^(?:static\s+|extern\s+|inline\s+|virtual\s+|constexpr\s+)*[\w_:<>]+(?:\s+[\w_:<>]+)*[\s*&]+([\w_:~]+)\s*\([^;]*$" => FunctionDeclaration,
];

const CSHARP_RULES: &[RuleDef] = rules![
    r"^using\s+(?:static\s+)?([\w.]+)\s*;" => UseDeclaration,
    r"^namespace\s+([\w.]+)" => NamespaceDeclaration,
    r"^(?:(?:public|internal|private|protected|static|abstract|sealed|partial)\s+)*class\s+([\w]+)" => ClassDeclaration,
    r"^(?:(?:public|internal|private|protected|partial)\s+)*interface\s+([\w]+)" => InterfaceDeclaration,
    r"^(?:(?:public|internal|private|protected|readonly|partial)\s+)*struct\s+([\w]+)" => StructDeclaration,
    r"^(?:public|private|protected|internal)\s+.*\s+([\w]+)\s*\(" => MethodDeclaration,
];

const PHP_RULES: &[RuleDef] = rules![
    r"^use\s+([\w\\]+)" => UseDeclaration,
    r#"^(?:require|include)(?:_once)?\s*\(?\s*['"]([^'"]+)['"]"# => ImportDeclaration,
    r"^namespace\s+([\w\\]+)" => NamespaceDeclaration,
    r"^(?:(?:abstract|final)\s+)?class\s+([\w]+)" => ClassDeclaration,
    r"^interface\s+([\w]+)" => InterfaceDeclaration,
    r"^trait\s+([\w]+)" => TraitDeclaration,
    r"^(?:(?:public|private|protected|static|abstract|final)\s+)*function\s+&?([\w]+)" => FunctionDeclaration,
];

const RUBY_RULES: &[RuleDef] = rules![
    r#"^require(?:_relative)?\s*\(?\s*['"]([^'"]+)['"]"# => ImportDeclaration,
    r"^class\s+([\w:]+)" => ClassDeclaration,
    r"^module\s+([\w:]+)" => ModuleDeclaration,
    r"^def\s+(?:self\.)?([\w?!=]+)" => MethodDeclaration,
];

// =============================================================================
// Compiled Catalogs
// =============================================================================

struct PatternRule {
    regex: Regex,
    kind: NodeKind,
}

/// Compiled rule set for one language
pub struct PatternCatalog {
    language: Language,
    rules: Vec<PatternRule>,
}

impl PatternCatalog {
    fn compile(language: Language, tables: &[&[RuleDef]]) -> Self {
        let rules = tables
            .iter()
            .flat_map(|table| table.iter())
            .filter_map(|def| match Regex::new(def.pattern) {
                Ok(regex) => Some(PatternRule {
                    regex,
                    kind: def.kind.clone(),
                }),
                Err(e) => {
                    tracing::error!("Invalid {} pattern {:?}: {}", language, def.pattern, e);
                    None
                }
            })
            .collect();
        Self { language, rules }
    }

    /// Catalog for a language; `Unknown` gets an empty catalog
    pub fn for_language(language: Language) -> &'static PatternCatalog {
        static JAVASCRIPT: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::JavaScript, &[JAVASCRIPT_RULES]));
        static TYPESCRIPT: LazyLock<PatternCatalog> = LazyLock::new(|| {
            PatternCatalog::compile(
                Language::TypeScript,
                &[JAVASCRIPT_RULES, TYPESCRIPT_EXTRA_RULES],
            )
        });
        static PYTHON: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::Python, &[PYTHON_RULES]));
        static JAVA: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::Java, &[JAVA_RULES]));
        static GO: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::Go, &[GO_RULES]));
        static RUST: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::Rust, &[RUST_RULES]));
        static CPP: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::Cpp, &[CPP_RULES]));
        static C: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::C, &[C_RULES]));
        static CSHARP: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::CSharp, &[CSHARP_RULES]));
        static PHP: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::Php, &[PHP_RULES]));
        static RUBY: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::Ruby, &[RUBY_RULES]));
        static UNKNOWN: LazyLock<PatternCatalog> =
            LazyLock::new(|| PatternCatalog::compile(Language::Unknown, &[]));

        match language {
            Language::JavaScript => &JAVASCRIPT,
            Language::TypeScript => &TYPESCRIPT,
            Language::Python => &PYTHON,
            Language::Java => &JAVA,
            Language::Go => &GO,
            Language::Rust => &RUST,
            Language::Cpp => &CPP,
            Language::C => &C,
            Language::CSharp => &CSHARP,
            Language::Php => &PHP,
            Language::Ruby => &RUBY,
            Language::Unknown => &UNKNOWN,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run line-based extraction over `content`.
    pub fn extract(&self, content: &str, snippet_max_chars: usize) -> Vec<StructuralNode> {
        let markers = self.language.comment_markers();
        let mut seen: HashSet<(NodeKind, String)> = HashSet::new();
        let mut nodes = Vec::new();

        for (index, line) in content.split('\n').enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || markers.iter().any(|m| trimmed.starts_with(m)) {
                continue;
            }

            for rule in &self.rules {
                let Some(caps) = rule.regex.captures(trimmed) else {
                    continue;
                };
                let name = caps.get(1).map(|m| m.as_str().trim());
                if rule.kind.family() == Some(NodeFamily::Function)
                    && name.is_some_and(|n| CONTROL_KEYWORDS.contains(&n))
                {
                    continue;
                }
                let node = StructuralNode::from_pattern(
                    rule.kind.clone(),
                    name,
                    index + 1,
                    truncate_snippet(trimmed, snippet_max_chars),
                );
                if seen.insert((node.kind.clone(), node.name.clone())) {
                    nodes.push(node);
                }
            }
        }

        nodes
    }
}

/// Cut `line` to `max_chars` characters, appending `...` when it was longer
pub fn truncate_snippet(line: &str, max_chars: usize) -> String {
    match line.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

// =============================================================================
// Parser Adapter
// =============================================================================

/// Pattern fallback exposed through the common `Parser` interface
pub struct PatternParser {
    catalog: &'static PatternCatalog,
    snippet_max_chars: usize,
}

impl PatternParser {
    pub fn new(language: Language) -> Self {
        Self {
            catalog: PatternCatalog::for_language(language),
            snippet_max_chars: SNIPPET_MAX_CHARS,
        }
    }

    pub fn with_snippet_max_chars(mut self, max_chars: usize) -> Self {
        self.snippet_max_chars = max_chars;
        self
    }

    /// Infallible form of `Parser::parse`
    pub fn extract(&self, content: &str) -> Vec<StructuralNode> {
        self.catalog.extract(content, self.snippet_max_chars)
    }
}

impl Parser for PatternParser {
    fn parse(&self, _path: &str, content: &str) -> Result<Vec<StructuralNode>, AnalysisError> {
        Ok(self.extract(content))
    }

    fn language(&self) -> Language {
        self.catalog.language()
    }

    fn strategy(&self) -> ParseStrategy {
        ParseStrategy::Patterns
    }
}
