//! JavaScript / TypeScript grammar strategy (tree-sitter)
//!
//! `.ts` files use the TypeScript grammar; `.tsx`, `.js` and `.jsx` use the
//! TSX grammar, which accepts JSX and plain JavaScript. Each top-level
//! statement becomes one structural node carrying its cleaned subtree.

use std::collections::HashSet;
use std::path::Path;

use tree_sitter::Node;

use super::tree::{TreeNode, clean_tree};
use super::{Language, Parser, create_ts_parser, get_node_text, node_span};
use crate::constants::analysis::MAX_TREE_DEPTH;
use crate::types::{AnalysisError, ParseStrategy, Span, StructuralNode};

pub struct TypeScriptParser {
    language: Language,
    max_depth: usize,
}

impl TypeScriptParser {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            max_depth: MAX_TREE_DEPTH,
        }
    }

    /// Trees deeper than `max_depth` are rejected before cleaning
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn grammar_for(path: &str) -> (tree_sitter::Language, &'static str) {
        let is_plain_ts = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ts"));
        if is_plain_ts {
            (tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), "TypeScript")
        } else {
            (tree_sitter_typescript::LANGUAGE_TSX.into(), "TSX")
        }
    }
}

impl Parser for TypeScriptParser {
    fn parse(&self, path: &str, content: &str) -> Result<Vec<StructuralNode>, AnalysisError> {
        let (grammar, grammar_name) = Self::grammar_for(path);
        let mut parser = create_ts_parser(grammar, grammar_name)?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            AnalysisError::parse(
                ParseStrategy::Grammar.as_str(),
                format!("{} parser returned no tree", grammar_name),
            )
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(root).unwrap_or(1);
            return Err(AnalysisError::parse(
                ParseStrategy::Grammar.as_str(),
                format!("syntax error near line {}", line),
            ));
        }

        if tree_depth(root, self.max_depth) > self.max_depth {
            return Err(AnalysisError::parse(
                ParseStrategy::Grammar.as_str(),
                format!("tree nested deeper than {} levels", self.max_depth),
            ));
        }

        let source = content.as_bytes();
        let mut visited = HashSet::new();
        let mut cursor = root.walk();
        let nodes = root
            .named_children(&mut cursor)
            .filter(|statement| !statement.is_extra())
            .map(|statement| {
                let tree = clean_tree(
                    &TsNode {
                        node: statement,
                        source,
                    },
                    &mut visited,
                );
                describe_statement(statement, source).with_tree(tree)
            })
            .collect();

        Ok(nodes)
    }

    fn language(&self) -> Language {
        self.language
    }

    fn strategy(&self) -> ParseStrategy {
        ParseStrategy::Grammar
    }
}

// =============================================================================
// Statement Description
// =============================================================================

/// Kind and name of a top-level statement, unwrapping `export` declarations
fn describe_statement(statement: Node, source: &[u8]) -> StructuralNode {
    let span = node_span(statement);

    if statement.kind() == "export_statement" {
        if let Some(declaration) = statement.child_by_field_name("declaration") {
            return describe_declaration(declaration, source, span).with_exported(true);
        }
        return StructuralNode::from_grammar(
            statement.kind(),
            export_name(statement, source),
            span,
        )
        .with_exported(true);
    }

    describe_declaration(statement, source, span)
}

fn describe_declaration(node: Node, source: &[u8], span: Span) -> StructuralNode {
    match node.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let declarator = first_named_child_of_kind(node, "variable_declarator");
            let name = declarator
                .and_then(|d| d.child_by_field_name("name"))
                .map(|n| get_node_text(n, source).to_string());
            let function_value = declarator
                .and_then(|d| d.child_by_field_name("value"))
                .filter(|v| {
                    matches!(
                        v.kind(),
                        "arrow_function" | "function_expression" | "function"
                    )
                });
            match function_value {
                Some(value) => StructuralNode::from_grammar(value.kind(), name, span),
                None => StructuralNode::from_grammar(node.kind(), name, span),
            }
        }
        "import_statement" => StructuralNode::from_grammar(
            node.kind(),
            node.child_by_field_name("source")
                .map(|s| unquote(get_node_text(s, source))),
            span,
        ),
        "expression_statement" => {
            let name = node
                .named_child(0)
                .filter(|expr| expr.kind() == "call_expression")
                .and_then(|call| call.child_by_field_name("function"))
                .map(|callee| get_node_text(callee, source).to_string());
            StructuralNode::from_grammar(node.kind(), name, span)
        }
        _ => StructuralNode::from_grammar(
            node.kind(),
            node.child_by_field_name("name")
                .map(|n| get_node_text(n, source).to_string()),
            span,
        ),
    }
}

/// Name for `export { a, b }`, `export * from 'x'` and `export default x`
fn export_name(statement: Node, source: &[u8]) -> Option<String> {
    if let Some(value) = statement.child_by_field_name("value") {
        let named = if value.kind() == "identifier" {
            Some(value)
        } else {
            value.child_by_field_name("name")
        };
        return named.map(|n| get_node_text(n, source).to_string());
    }
    if let Some(clause) = first_named_child_of_kind(statement, "export_clause") {
        let mut cursor = clause.walk();
        let names: Vec<&str> = clause
            .named_children(&mut cursor)
            .filter_map(|spec| spec.child_by_field_name("name"))
            .map(|n| get_node_text(n, source))
            .collect();
        return (!names.is_empty()).then(|| names.join(", "));
    }
    statement
        .child_by_field_name("source")
        .map(|s| unquote(get_node_text(s, source)))
}

fn first_named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

/// 1-based line of the first ERROR or MISSING node, depth first
fn first_error_line(root: Node) -> Option<usize> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Depth of the tree (root = 1), walked with a cursor so deep input cannot
/// exhaust the stack. Stops as soon as `limit` is exceeded.
fn tree_depth(root: Node, limit: usize) -> usize {
    let mut cursor = root.walk();
    let mut depth = 1;
    let mut deepest = 1;
    loop {
        if cursor.goto_first_child() {
            depth += 1;
            deepest = deepest.max(depth);
            if deepest > limit {
                return deepest;
            }
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return deepest;
            }
            depth -= 1;
        }
    }
}

// =============================================================================
// Tree Cleaning Adapter
// =============================================================================

struct TsNode<'tree, 'src> {
    node: Node<'tree>,
    source: &'src [u8],
}

impl TreeNode for TsNode<'_, '_> {
    type Id = usize;

    fn id(&self) -> usize {
        self.node.id()
    }

    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn span(&self) -> Span {
        node_span(self.node)
    }

    fn is_extra(&self) -> bool {
        self.node.is_extra()
    }

    fn leaf_text(&self) -> Option<String> {
        self.node
            .is_named()
            .then(|| get_node_text(self.node, self.source).to_string())
    }

    fn children(&self) -> Vec<(Option<String>, Self)> {
        let mut cursor = self.node.walk();
        let mut children = Vec::new();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                let field = cursor.field_name();
                if child.is_named() || field.is_some() {
                    children.push((
                        field.map(str::to_string),
                        TsNode {
                            node: child,
                            source: self.source,
                        },
                    ));
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        children
    }
}
