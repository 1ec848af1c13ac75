use crate::types::{AnalysisError, ParseStrategy, Span, StructuralNode};

/// A strategy turning file content into top-level structural nodes.
///
/// Grammar and interpreter strategies may fail; the analyzer then falls back
/// to the pattern strategy, which never does.
pub trait Parser: Send + Sync {
    fn parse(&self, path: &str, content: &str) -> Result<Vec<StructuralNode>, AnalysisError>;
    fn language(&self) -> super::Language;
    fn strategy(&self) -> ParseStrategy;
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// Span of a tree-sitter node with 1-based lines
pub fn node_span(node: tree_sitter::Node) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span {
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        start_line: start.row + 1,
        start_column: start.column,
        end_line: end.row + 1,
        end_column: end.column,
    }
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser, AnalysisError> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language.into()).map_err(|e| {
        AnalysisError::parse(
            ParseStrategy::Grammar.as_str(),
            format!("Failed to set {} language: {}", lang_name, e),
        )
    })?;
    Ok(parser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_span_is_one_based() {
        let mut parser =
            create_ts_parser(tree_sitter_typescript::LANGUAGE_TYPESCRIPT, "TypeScript").unwrap();
        let source = "\nlet x = 1;";
        let tree = parser.parse(source, None).unwrap();
        let statement = tree.root_node().named_child(0).unwrap();

        let span = node_span(statement);
        assert_eq!(span.start_line, 2);
        assert_eq!(span.start_column, 0);
        assert_eq!(span.start_byte, 1);
        assert_eq!(span.end_byte, source.len());
        assert_eq!(get_node_text(statement, source.as_bytes()), "let x = 1;");
    }
}
