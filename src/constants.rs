//! Global Constants
//!
//! Default values for every tunable heuristic. `config::types` builds its
//! defaults from these; nothing else should hard-code them.

/// Tree walk constants
pub mod walk {
    /// Directory names never descended into
    pub const EXCLUDED_DIRECTORY_NAMES: &[&str] =
        &[".git", "node_modules", "dist", "build", "__pycache__"];

    /// Project-level config file looked up in the working directory
    pub const PROJECT_CONFIG_FILE: &str = ".repoguide.toml";
}

/// File analysis constants
pub mod analysis {
    /// Placeholder name for nodes without a capturable identifier
    pub const ANONYMOUS: &str = "anonymous";

    /// Fallback snippets longer than this are cut and suffixed with `...`
    pub const SNIPPET_MAX_CHARS: usize = 80;

    /// Files above this size are recorded as read failures (5MB)
    pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

    /// Grammar trees nested deeper than this fall back to patterns
    pub const MAX_TREE_DEPTH: usize = 512;

    /// Circular reference marker in cleaned grammar trees
    pub const CIRCULAR_MARKER: &str = "[Circular]";
}

/// External interpreter constants
pub mod interpreter {
    pub const DEFAULT_PYTHON: &str = "python3";

    /// Wall-clock limit for one interpreter invocation
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
}

/// Importance scoring constants
pub mod scoring {
    /// Base-name fragments that mark an application entry point
    pub const ENTRY_POINT_HINTS: &[&str] = &["index", "main", "app", "server"];

    pub const ENTRY_POINT_BONUS: u32 = 50;

    /// Exclusive line-count window that earns the size bonus
    pub const SIZE_WINDOW: (usize, usize) = (50, 500);

    pub const SIZE_BONUS: u32 = 20;

    pub const FUNCTION_WEIGHT: u32 = 5;

    pub const CLASS_WEIGHT: u32 = 10;

    pub const IMPORT_WEIGHT: u32 = 2;

    /// Upper bound of the import contribution
    pub const IMPORT_CAP: u32 = 20;

    /// Number of files in the key-file list
    pub const KEY_FILE_LIMIT: usize = 10;
}

/// Insight heuristic constants
pub mod insights {
    /// Strictly more distinct languages than this is "multi-language"
    pub const MULTI_LANGUAGE_THRESHOLD: usize = 3;

    /// Object-oriented when `classes > functions * ratio`
    pub const OO_RATIO: f64 = 0.5;

    /// Functional when `functions > classes * ratio`
    pub const FUNCTIONAL_RATIO: f64 = 3.0;

    pub const COMPONENT_EXTENSIONS: &[&str] = &[".jsx", ".tsx"];

    pub const STATE_PATH_TOKENS: &[&str] = &["slice", "store"];

    pub const STATE_IMPORT_TOKENS: &[&str] = &["redux"];

    pub const ROUTING_IMPORT_TOKENS: &[&str] = &["router"];

    pub const API_PATH_TOKENS: &[&str] = &["api", "service"];

    pub const API_FUNCTION_TOKEN: &str = "fetch";

    pub const TEST_PATH_TOKENS: &[&str] = &["test", "spec"];

    pub const CONFIG_FILE_TOKENS: &[&str] = &[
        "package.json",
        "requirements.txt",
        "Cargo.toml",
        "pom.xml",
        "vite.config",
        "tailwind.config",
    ];

    pub const CSS_FRAMEWORK_TOKENS: &[&str] = &["tailwind"];

    pub const STYLESHEET_EXTENSIONS: &[&str] = &[".css", ".scss"];

    pub const FEATURE_PATH_TOKENS: &[&str] = &["features"];
}
