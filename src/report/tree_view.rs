//! Directory tree built from record paths, rendered with box-drawing
//! connectors and parsed back from that rendering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{GuideError, Result};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

/// A file (`null` in JSON) or a nested directory (an object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeEntry {
    File,
    Directory(DirectoryTree),
}

/// Children of one directory, in lexicographic order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryTree {
    entries: BTreeMap<String, TreeEntry>,
}

impl DirectoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `/`-separated paths
    pub fn from_paths<'a, I>(paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tree = Self::new();
        for path in paths {
            let segments: Vec<&str> = path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
            tree.insert(&segments);
        }
        tree
    }

    /// Insert a path; intermediate segments become directories.
    ///
    /// A file that later gains children is promoted to a directory, and an
    /// existing directory is never demoted to a file.
    pub fn insert<S: AsRef<str>>(&mut self, segments: &[S]) {
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = self;
        for segment in parents {
            let entry = current
                .entries
                .entry(segment.as_ref().to_string())
                .or_insert(TreeEntry::File);
            if matches!(entry, TreeEntry::File) {
                *entry = TreeEntry::Directory(DirectoryTree::new());
            }
            let TreeEntry::Directory(child) = entry else {
                return;
            };
            current = child;
        }

        current
            .entries
            .entry(last.as_ref().to_string())
            .or_insert(TreeEntry::File);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TreeEntry)> {
        self.entries.iter()
    }

    /// Every leaf as a `/`-joined path, depth-first
    pub fn file_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths("", &mut out);
        out
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, entry) in &self.entries {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };
            match entry {
                TreeEntry::File => out.push(path),
                TreeEntry::Directory(child) => child.collect_paths(&path, out),
            }
        }
    }

    /// Render depth-first, one line per entry
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into("", &mut out);
        out
    }

    fn render_into(&self, prefix: &str, out: &mut String) {
        let last_index = self.entries.len().saturating_sub(1);
        for (index, (name, entry)) in self.entries.iter().enumerate() {
            let is_last = index == last_index;
            out.push_str(prefix);
            out.push_str(if is_last { LAST_BRANCH } else { BRANCH });
            out.push_str(name);
            out.push('\n');

            if let TreeEntry::Directory(child) = entry {
                let child_prefix = format!("{}{}", prefix, if is_last { BLANK } else { PIPE });
                child.render_into(&child_prefix, out);
            }
        }
    }
}

/// Rebuild a [`DirectoryTree`] from [`DirectoryTree::render`] output
pub fn parse_tree_view(text: &str) -> Result<DirectoryTree> {
    let mut tree = DirectoryTree::new();
    let mut ancestors: Vec<String> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;

        let mut rest = line;
        let mut depth = 0;
        while let Some(stripped) = rest.strip_prefix(PIPE).or_else(|| rest.strip_prefix(BLANK)) {
            rest = stripped;
            depth += 1;
        }

        let name = rest
            .strip_prefix(BRANCH)
            .or_else(|| rest.strip_prefix(LAST_BRANCH))
            .ok_or_else(|| GuideError::TreeView {
                line: line_no,
                message: "missing connector".to_string(),
            })?;

        if name.is_empty() {
            return Err(GuideError::TreeView {
                line: line_no,
                message: "empty entry name".to_string(),
            });
        }
        if depth > ancestors.len() {
            return Err(GuideError::TreeView {
                line: line_no,
                message: format!("indented {} levels below its parent", depth - ancestors.len()),
            });
        }

        ancestors.truncate(depth);
        ancestors.push(name.to_string());
        tree.insert(&ancestors);
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DirectoryTree {
        DirectoryTree::from_paths([
            "src/index.ts",
            "src/util/math.ts",
            "src/util/io.ts",
            "README.md",
            "tests/app.test.ts",
        ])
    }

    #[test]
    fn test_render_connectors() {
        let rendered = sample().render();
        let expected = "\
├── README.md
├── src
│   ├── index.ts
│   └── util
│       ├── io.ts
│       └── math.ts
└── tests
    └── app.test.ts
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_round_trip() {
        let tree = sample();
        let parsed = parse_tree_view(&tree.render()).unwrap();
        assert_eq!(parsed, tree);
        assert_eq!(
            parsed.file_paths(),
            vec![
                "README.md",
                "src/index.ts",
                "src/util/io.ts",
                "src/util/math.ts",
                "tests/app.test.ts",
            ]
        );
    }

    #[test]
    fn test_empty_tree() {
        let tree = DirectoryTree::from_paths(std::iter::empty());
        assert_eq!(tree.render(), "");
        assert!(parse_tree_view("").unwrap().is_empty());
    }

    #[test]
    fn test_file_promoted_to_directory() {
        let mut tree = DirectoryTree::new();
        tree.insert(&["a"]);
        tree.insert(&["a", "b.ts"]);
        tree.insert(&["a"]);
        assert!(matches!(tree.get("a"), Some(TreeEntry::Directory(_))));
        assert_eq!(tree.file_paths(), vec!["a/b.ts"]);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(matches!(
            parse_tree_view("src/index.ts\n"),
            Err(GuideError::TreeView { line: 1, .. })
        ));
        assert!(matches!(
            parse_tree_view("├── src\n        └── deep.ts\n"),
            Err(GuideError::TreeView { line: 2, .. })
        ));
    }

    #[test]
    fn test_serializes_files_as_null() {
        let tree = DirectoryTree::from_paths(["src/main.rs"]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json, serde_json::json!({ "src": { "main.rs": null } }));
    }
}
