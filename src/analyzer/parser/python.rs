//! Python interpreter strategy
//!
//! Runs the host interpreter's `ast` module over the source (fed on stdin)
//! and converts the JSON dump into structural nodes. The subprocess is
//! bounded by a timeout and killed when the call returns, so no process
//! outlives the analysis of one file.

use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::{Language, Parser};
use crate::config::InterpreterConfig;
use crate::types::{AnalysisError, ParseStrategy, Span, StructuralNode};

/// Dumps `ast.parse(stdin)` as JSON, or `{"error": ...}` on failure
const AST_DUMP_SCRIPT: &str = r#"
import ast, json, sys

def to_dict(node):
    if isinstance(node, ast.AST):
        result = {'type': node.__class__.__name__}
        for attr in ('lineno', 'col_offset', 'end_lineno', 'end_col_offset'):
            if hasattr(node, attr):
                result[attr] = getattr(node, attr)
        for field, value in ast.iter_fields(node):
            if isinstance(value, list):
                result[field] = [to_dict(item) for item in value]
            elif isinstance(value, ast.AST):
                result[field] = to_dict(value)
            elif isinstance(value, (str, int, float, bool, type(None))):
                result[field] = value
            else:
                result[field] = repr(value)
        return result
    return repr(node)

try:
    source = sys.stdin.buffer.read().decode('utf-8', 'replace')
    print(json.dumps(to_dict(ast.parse(source))))
except Exception as e:
    print(json.dumps({'error': str(e)}))
"#;

pub struct PythonParser {
    interpreter: String,
    timeout_secs: u64,
}

impl PythonParser {
    pub fn new(config: &InterpreterConfig) -> Self {
        Self {
            interpreter: config.python.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    fn failure(message: impl Into<String>) -> AnalysisError {
        AnalysisError::parse(ParseStrategy::Interpreter.as_str(), message)
    }

    /// Run the interpreter on a single-threaded runtime owned by a scoped
    /// thread, so callers already inside a tokio runtime can block on it.
    fn dump_ast(&self, content: &str) -> Result<Value, AnalysisError> {
        std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let runtime = tokio::runtime::Builder::new_current_thread()
                        .enable_io()
                        .enable_time()
                        .build()
                        .map_err(|e| Self::failure(format!("Failed to start runtime: {}", e)))?;
                    runtime.block_on(self.execute(content))
                })
                .join()
                .unwrap_or_else(|_| Err(Self::failure("interpreter worker panicked")))
        })
    }

    async fn execute(&self, content: &str) -> Result<Value, AnalysisError> {
        debug!("Executing {} ast dump", self.interpreter);

        let mut child = Command::new(&self.interpreter)
            .arg("-c")
            .arg(AST_DUMP_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Self::failure(format!("Failed to spawn {}: {}", self.interpreter, e))
            })?;

        let limit = Duration::from_secs(self.timeout_secs);
        let output = timeout(limit, async {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(content.as_bytes()).await?;
            }
            child.wait_with_output().await
        })
        .await
        .map_err(|_| Self::failure(format!("timed out after {}s", self.timeout_secs)))?
        .map_err(|e| Self::failure(format!("execution failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::failure(format!(
                "interpreter exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let dump: Value = serde_json::from_str(stdout.trim())
            .map_err(|e| Self::failure(format!("invalid AST JSON: {}", e)))?;

        if let Some(error) = dump.get("error").and_then(Value::as_str) {
            return Err(Self::failure(error.to_string()));
        }
        Ok(dump)
    }
}

impl Parser for PythonParser {
    fn parse(&self, _path: &str, content: &str) -> Result<Vec<StructuralNode>, AnalysisError> {
        let dump = self.dump_ast(content)?;
        statements_from_ast(&dump, content)
    }

    fn language(&self) -> Language {
        Language::Python
    }

    fn strategy(&self) -> ParseStrategy {
        ParseStrategy::Interpreter
    }
}

/// Convert a `Module` dump into one node per top-level statement.
///
/// `import a, b` yields one `Import` node per alias so every module name is
/// visible to metadata collection.
pub fn statements_from_ast(dump: &Value, content: &str) -> Result<Vec<StructuralNode>, AnalysisError> {
    let body = dump
        .get("body")
        .and_then(Value::as_array)
        .ok_or_else(|| PythonParser::failure("AST dump has no module body"))?;

    let line_starts = line_start_offsets(content);
    let mut nodes = Vec::with_capacity(body.len());

    for statement in body {
        let Some(kind) = statement.get("type").and_then(Value::as_str) else {
            continue;
        };
        let span = statement_span(statement, &line_starts);
        let names: Vec<Option<String>> = match kind {
            "Import" => statement
                .get("names")
                .and_then(Value::as_array)
                .map(|aliases| {
                    aliases
                        .iter()
                        .map(|alias| alias.get("name").and_then(Value::as_str).map(str::to_string))
                        .collect()
                })
                .unwrap_or_else(|| vec![None]),
            "ImportFrom" => vec![import_from_name(statement)],
            _ => vec![
                statement
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            ],
        };

        for name in names {
            nodes.push(StructuralNode::from_grammar(kind, name, span).with_tree(statement.clone()));
        }
    }

    Ok(nodes)
}

/// `from .pkg import x` keeps its leading dots
fn import_from_name(statement: &Value) -> Option<String> {
    let level = statement.get("level").and_then(Value::as_u64).unwrap_or(0) as usize;
    let module = statement.get("module").and_then(Value::as_str).unwrap_or("");
    let name = format!("{}{}", ".".repeat(level), module);
    (!name.is_empty()).then_some(name)
}

fn line_start_offsets(content: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(content.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Python reports 1-based lines and UTF-8 byte columns
fn statement_span(statement: &Value, line_starts: &[usize]) -> Span {
    let field = |name: &str| statement.get(name).and_then(Value::as_u64).map(|v| v as usize);
    let start_line = field("lineno").unwrap_or(1).max(1);
    let start_column = field("col_offset").unwrap_or(0);
    let end_line = field("end_lineno").unwrap_or(start_line).max(1);
    let end_column = field("end_col_offset").unwrap_or(start_column);
    let offset = |line: usize, column: usize| {
        line_starts.get(line - 1).copied().unwrap_or(0) + column
    };
    Span {
        start_byte: offset(start_line, start_column),
        end_byte: offset(end_line, end_column),
        start_line,
        start_column,
        end_line,
        end_column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NodeFamily, NodeKind};
    use serde_json::json;

    #[test]
    fn test_statements_from_ast() {
        let content = "import os, sys\nfrom ..core import x\n\nclass A:\n    pass\nasync def go():\n    pass\n";
        let dump = json!({
            "type": "Module",
            "body": [
                {"type": "Import", "lineno": 1, "col_offset": 0, "end_lineno": 1, "end_col_offset": 14,
                 "names": [{"type": "alias", "name": "os"}, {"type": "alias", "name": "sys"}]},
                {"type": "ImportFrom", "lineno": 2, "col_offset": 0, "module": "core", "level": 2,
                 "names": [{"type": "alias", "name": "x"}]},
                {"type": "ClassDef", "lineno": 4, "col_offset": 0, "end_lineno": 5, "end_col_offset": 8,
                 "name": "A", "body": []},
                {"type": "AsyncFunctionDef", "lineno": 6, "col_offset": 0, "name": "go", "body": []}
            ]
        });

        let nodes = statements_from_ast(&dump, content).unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].kind, NodeKind::Import);
        assert_eq!(nodes[0].name, "os");
        assert_eq!(nodes[1].name, "sys");
        assert_eq!(nodes[2].kind, NodeKind::ImportFrom);
        assert_eq!(nodes[2].name, "..core");
        assert_eq!(nodes[3].kind, NodeKind::ClassDef);
        assert_eq!(nodes[3].line, 4);
        assert_eq!(nodes[4].kind.family(), Some(NodeFamily::Function));

        let class_span = nodes[3].span.unwrap();
        assert_eq!(&content[class_span.start_byte..class_span.end_byte], "class A:\n    pass");
        assert!(nodes.iter().all(|n| n.content.is_none() && n.tree.is_some()));
    }

    #[test]
    fn test_dump_without_body_is_failure() {
        let err = statements_from_ast(&json!({"type": "Expression"}), "").unwrap_err();
        assert!(matches!(err, AnalysisError::ParseFailure { .. }));
    }

    #[test]
    fn test_missing_interpreter_is_parse_failure() {
        let parser = PythonParser::new(&InterpreterConfig {
            enabled: true,
            python: "repoguide-no-such-interpreter".to_string(),
            timeout_secs: 5,
        });
        let err = parser.parse("a.py", "def f():\n    pass\n").unwrap_err();
        assert!(matches!(err, AnalysisError::ParseFailure { .. }));
        assert!(err.to_string().starts_with("interpreter parse failed"));
    }

    #[tokio::test]
    async fn test_parse_from_async_context_does_not_panic() {
        let parser = PythonParser::new(&InterpreterConfig {
            enabled: true,
            python: "repoguide-no-such-interpreter".to_string(),
            timeout_secs: 5,
        });
        let err = parser.parse("a.py", "x = 1\n").unwrap_err();
        assert!(matches!(err, AnalysisError::ParseFailure { .. }));
    }
}
