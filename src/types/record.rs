//! File Record data model
//!
//! One `FileRecord` per analyzed file. Its `syntax_body` holds the top-level
//! `StructuralNode`s produced by whichever strategy succeeded, and its
//! `metadata` is derived from those nodes plus the raw content.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::parser::Language;
use crate::constants::analysis::ANONYMOUS;

// =============================================================================
// Node Kind
// =============================================================================

/// Which metadata set a node's name feeds into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeFamily {
    Function,
    Class,
    Import,
}

macro_rules! node_kinds {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Structural kind of an extracted node.
        ///
        /// Fallback extraction only produces the named variants; grammar
        /// strategies report their own node types through `Grammar`.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum NodeKind {
            $($variant,)*
            Grammar(String),
        }

        impl NodeKind {
            pub fn as_str(&self) -> &str {
                match self {
                    $(NodeKind::$variant => $name,)*
                    NodeKind::Grammar(kind) => kind,
                }
            }
        }

        impl From<&str> for NodeKind {
            fn from(s: &str) -> Self {
                match s {
                    $($name => NodeKind::$variant,)*
                    other => NodeKind::Grammar(other.to_string()),
                }
            }
        }
    };
}

node_kinds! {
    FunctionDeclaration => "FunctionDeclaration",
    ArrowFunction => "ArrowFunction",
    AsyncArrowFunction => "AsyncArrowFunction",
    FunctionComponent => "FunctionComponent",
    ClassDeclaration => "ClassDeclaration",
    InterfaceDeclaration => "InterfaceDeclaration",
    TypeAlias => "TypeAlias",
    ImportDeclaration => "ImportDeclaration",
    ExportDeclaration => "ExportDeclaration",
    NamedExport => "NamedExport",
    Hook => "Hook",
    ReduxSlice => "ReduxSlice",
    ReduxStore => "ReduxStore",
    StructDeclaration => "StructDeclaration",
    ImplDeclaration => "ImplDeclaration",
    UseDeclaration => "UseDeclaration",
    MethodDeclaration => "MethodDeclaration",
    FunctionDef => "FunctionDef",
    ClassDef => "ClassDef",
    Import => "Import",
    ImportFrom => "ImportFrom",
    ModuleDeclaration => "ModuleDeclaration",
    NamespaceDeclaration => "NamespaceDeclaration",
    EnumDeclaration => "EnumDeclaration",
    TraitDeclaration => "TraitDeclaration",
}

/// Grammar node types (tree-sitter and Python `ast`) that count as functions
const GRAMMAR_FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "arrow_function",
    "AsyncFunctionDef",
];

const GRAMMAR_CLASS_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration"];

const GRAMMAR_IMPORT_KINDS: &[&str] = &["import_statement"];

impl NodeKind {
    pub fn family(&self) -> Option<NodeFamily> {
        match self {
            NodeKind::FunctionDeclaration
            | NodeKind::FunctionDef
            | NodeKind::ArrowFunction
            | NodeKind::AsyncArrowFunction
            | NodeKind::FunctionComponent
            | NodeKind::MethodDeclaration => Some(NodeFamily::Function),
            NodeKind::ClassDeclaration | NodeKind::ClassDef => Some(NodeFamily::Class),
            NodeKind::ImportDeclaration
            | NodeKind::Import
            | NodeKind::ImportFrom
            | NodeKind::UseDeclaration => Some(NodeFamily::Import),
            NodeKind::Grammar(kind) => {
                let kind = kind.as_str();
                if GRAMMAR_FUNCTION_KINDS.contains(&kind) {
                    Some(NodeFamily::Function)
                } else if GRAMMAR_CLASS_KINDS.contains(&kind) {
                    Some(NodeFamily::Class)
                } else if GRAMMAR_IMPORT_KINDS.contains(&kind) {
                    Some(NodeFamily::Import)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        NodeKind::from(s.as_str())
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Structural Node
// =============================================================================

/// Byte offsets plus 1-based line / 0-based column positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

/// One extracted syntactic unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralNode {
    pub kind: NodeKind,
    pub name: String,
    /// 1-based line of first occurrence
    pub line: usize,
    /// Truncated source line; fallback nodes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Grammar position; grammar nodes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exported: bool,
    /// Cleaned grammar subtree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<serde_json::Value>,
}

impl StructuralNode {
    /// Node produced by pattern fallback
    pub fn from_pattern(kind: NodeKind, name: Option<&str>, line: usize, content: String) -> Self {
        Self {
            kind,
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or(ANONYMOUS)
                .to_string(),
            line,
            content: Some(content),
            span: None,
            exported: false,
            tree: None,
        }
    }

    /// Node produced by a grammar strategy
    pub fn from_grammar(kind: impl Into<NodeKind>, name: Option<String>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            line: span.start_line,
            content: None,
            span: Some(span),
            exported: false,
            tree: None,
        }
    }

    pub fn with_tree(mut self, tree: serde_json::Value) -> Self {
        self.tree = Some(tree);
        self
    }

    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS
    }
}

// =============================================================================
// File Record
// =============================================================================

/// Which strategy produced a record's syntax body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStrategy {
    Grammar,
    Interpreter,
    Patterns,
}

impl ParseStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStrategy::Grammar => "grammar",
            ParseStrategy::Interpreter => "interpreter",
            ParseStrategy::Patterns => "patterns",
        }
    }
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub line_count: usize,
    pub byte_size: u64,
    pub function_names: BTreeSet<String>,
    pub class_names: BTreeSet<String>,
    pub import_names: BTreeSet<String>,
}

impl FileMetadata {
    /// Line count is the number of `\n` plus one, so an empty file has one line.
    pub fn from_content(content: &str, byte_size: u64) -> Self {
        Self {
            line_count: count_lines(content),
            byte_size,
            ..Default::default()
        }
    }

    /// Fill the name sets from top-level nodes, skipping anonymous ones
    pub fn collect_names(&mut self, nodes: &[StructuralNode]) {
        for node in nodes.iter().filter(|n| !n.is_anonymous()) {
            let target = match node.kind.family() {
                Some(NodeFamily::Function) => &mut self.function_names,
                Some(NodeFamily::Class) => &mut self.class_names,
                Some(NodeFamily::Import) => &mut self.import_names,
                None => continue,
            };
            target.insert(node.name.clone());
        }
    }
}

pub fn count_lines(content: &str) -> usize {
    content.bytes().filter(|b| *b == b'\n').count() + 1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ParseStrategy>,
    pub syntax_body: Option<Vec<StructuralNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metadata: FileMetadata,
}

impl FileRecord {
    /// Degraded record carrying only an error and whatever metadata is known
    pub fn failed(
        path: impl Into<String>,
        language: Language,
        error: impl fmt::Display,
        metadata: FileMetadata,
    ) -> Self {
        Self {
            path: path.into(),
            language,
            strategy: None,
            syntax_body: None,
            error: Some(error.to_string()),
            metadata,
        }
    }

    pub fn parsed(
        path: impl Into<String>,
        language: Language,
        strategy: ParseStrategy,
        nodes: Vec<StructuralNode>,
        mut metadata: FileMetadata,
    ) -> Self {
        metadata.collect_names(&nodes);
        Self {
            path: path.into(),
            language,
            strategy: Some(strategy),
            syntax_body: Some(nodes),
            error: None,
            metadata,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Final path segment, used by the entry-point heuristics
    pub fn file_name(&self) -> &str {
        self.path.rsplit(['/', '\\']).next().unwrap_or(&self.path)
    }
}

// =============================================================================
// Analysis Set
// =============================================================================

/// Append-only list of records from one walk; paths are unique.
///
/// Serializes as a plain array of records. The path index is rebuilt on
/// deserialize, which also drops any duplicate paths.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Vec<FileRecord>")]
pub struct AnalysisSet {
    records: Vec<FileRecord>,
    index: HashMap<String, usize>,
}

impl AnalysisSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; a record whose path is already present is rejected
    pub fn push(&mut self, record: FileRecord) -> bool {
        if self.index.contains_key(&record.path) {
            tracing::warn!("Duplicate record for {} ignored", record.path);
            return false;
        }
        self.index.insert(record.path.clone(), self.records.len());
        self.records.push(record);
        true
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.index.get(path).map(|&i| &self.records[i])
    }
}

impl PartialEq for AnalysisSet {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Serialize for AnalysisSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl From<Vec<FileRecord>> for AnalysisSet {
    fn from(records: Vec<FileRecord>) -> Self {
        records.into_iter().collect()
    }
}

impl FromIterator<FileRecord> for AnalysisSet {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut set = AnalysisSet::new();
        for record in iter {
            set.push(record);
        }
        set
    }
}

impl<'a> IntoIterator for &'a AnalysisSet {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
