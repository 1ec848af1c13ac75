use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;

use crate::config::WalkConfig;
use crate::types::{GuideError, Result};

/// One candidate produced by the scan, in deterministic walk order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEntry {
    /// A regular file; `relative` uses `/` separators
    File { path: PathBuf, relative: String },
    /// A directory (or entry) that could not be read
    Unreadable { relative: String, message: String },
}

impl ScanEntry {
    pub fn relative(&self) -> &str {
        match self {
            ScanEntry::File { relative, .. } | ScanEntry::Unreadable { relative, .. } => relative,
        }
    }
}

/// Enumerates files under a root, lexicographically per directory,
/// never descending into excluded directory names.
pub struct FileScanner {
    root: PathBuf,
    excluded: BTreeSet<String>,
    respect_gitignore: bool,
    follow_links: bool,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let defaults = WalkConfig::default();
        Self {
            root: root.as_ref().to_path_buf(),
            excluded: defaults.excluded_directory_names,
            respect_gitignore: defaults.respect_gitignore,
            follow_links: defaults.follow_links,
        }
    }

    pub fn from_config<P: AsRef<Path>>(root: P, config: &WalkConfig) -> Self {
        Self::new(root)
            .with_excluded(config.excluded_directory_names.clone())
            .with_gitignore(config.respect_gitignore)
            .with_follow_links(config.follow_links)
    }

    pub fn with_excluded(mut self, names: BTreeSet<String>) -> Self {
        self.excluded = names;
        self
    }

    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Fail unless the root exists, is a directory and can be listed
    pub fn check_root(&self) -> Result<()> {
        let metadata =
            fs::metadata(&self.root).map_err(|e| GuideError::from_root_io(&self.root, &e))?;
        if !metadata.is_dir() {
            return Err(GuideError::RootNotDirectory {
                path: self.root.clone(),
            });
        }
        fs::read_dir(&self.root).map_err(|e| GuideError::from_root_io(&self.root, &e))?;
        Ok(())
    }

    /// Lazily walk the tree after validating the root.
    ///
    /// Unreadable subtrees surface as `ScanEntry::Unreadable`; the walk
    /// continues with their siblings.
    pub fn entries(&self) -> Result<impl Iterator<Item = ScanEntry> + use<>> {
        self.check_root()?;

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(self.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b));

        if self.respect_gitignore {
            builder.git_ignore(true).git_exclude(true).require_git(false);
        }

        let excluded = self.excluded.clone();
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(entry.depth() > 0
                && is_dir
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| excluded.contains(name)))
        });

        let root = self.root.clone();
        let entries = builder.build().filter_map(move |result| match result {
            Ok(entry) => {
                let is_file = entry.file_type().is_some_and(|t| t.is_file());
                is_file.then(|| ScanEntry::File {
                    relative: relative_path(&root, entry.path()),
                    path: entry.into_path(),
                })
            }
            Err(err) => {
                let relative = error_path(&err)
                    .map(|p| relative_path(&root, p))
                    .unwrap_or_default();
                Some(ScanEntry::Unreadable {
                    relative,
                    message: error_message(&err),
                })
            }
        });

        Ok(entries)
    }

    /// Collect all entries
    pub fn scan(&self) -> Result<Vec<ScanEntry>> {
        Ok(self.entries()?.collect())
    }
}

/// `root`-relative path joined with `/`
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child),
        _ => None,
    }
}

/// Innermost I/O message when there is one, the full error otherwise
fn error_message(err: &ignore::Error) -> String {
    match err {
        ignore::Error::WithPath { err, .. }
        | ignore::Error::WithDepth { err, .. }
        | ignore::Error::WithLineNumber { err, .. } => error_message(err),
        ignore::Error::Io(io) => io.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn relatives(scanner: &FileScanner) -> Vec<String> {
        scanner
            .scan()
            .unwrap()
            .iter()
            .map(|e| e.relative().to_string())
            .collect()
    }

    #[test]
    fn test_lexicographic_order_and_exclusion() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/b.ts");
        touch(dir.path(), "src/a.ts");
        touch(dir.path(), "node_modules/lib.js");
        touch(dir.path(), "src/dist/out.js");
        touch(dir.path(), ".git/HEAD");
        touch(dir.path(), "README.md");

        let files = relatives(&FileScanner::new(dir.path()));
        assert_eq!(files, vec!["README.md", "src/a.ts", "src/b.ts"]);
    }

    #[test]
    fn test_excluded_names_only_match_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "build");
        let files = relatives(&FileScanner::new(dir.path()));
        assert_eq!(files, vec!["build"]);
    }

    #[test]
    fn test_root_named_like_excluded_dir_is_walked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("build");
        touch(&root, "main.go");
        let files = relatives(&FileScanner::new(&root));
        assert_eq!(files, vec!["main.go"]);
    }

    #[test]
    fn test_custom_exclusions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "vendor/x.go");
        touch(dir.path(), "node_modules/y.js");
        let scanner = FileScanner::new(dir.path())
            .with_excluded(["vendor".to_string()].into_iter().collect());
        assert_eq!(relatives(&scanner), vec!["node_modules/y.js"]);
    }

    #[test]
    fn test_gitignore_is_optional() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "keep.ts");
        touch(dir.path(), "generated/skip.ts");
        fs::write(dir.path().join(".gitignore"), "generated/\n").unwrap();

        let all = relatives(&FileScanner::new(dir.path()));
        assert!(all.contains(&"generated/skip.ts".to_string()));

        let filtered = relatives(&FileScanner::new(dir.path()).with_gitignore(true));
        assert!(!filtered.contains(&"generated/skip.ts".to_string()));
        assert!(filtered.contains(&"keep.ts".to_string()));
    }

    #[test]
    fn test_root_errors() {
        let dir = TempDir::new().unwrap();
        let missing = FileScanner::new(dir.path().join("missing"));
        assert!(matches!(
            missing.check_root(),
            Err(GuideError::RootNotFound { .. })
        ));

        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            FileScanner::new(&file).check_root(),
            Err(GuideError::RootNotDirectory { .. })
        ));
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/repo");
        assert_eq!(
            relative_path(root, &root.join("src").join("app").join("main.rs")),
            "src/app/main.rs"
        );
    }
}
