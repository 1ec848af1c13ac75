//! Configuration Types
//!
//! All configuration structures with defaults taken from `constants`.
//! Every heuristic weight and threshold is a parameter here rather than a
//! hard invariant, so rankings and insights can be tuned per project.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::analyzer::parser::Language;
use crate::constants::{analysis, insights, interpreter, scoring, walk};
use crate::types::GuideError;

fn string_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory traversal settings
    pub walk: WalkConfig,

    /// Per-file analysis settings
    pub analysis: AnalysisConfig,

    /// Importance ranking weights
    pub scoring: ScoringConfig,

    /// Insight heuristic thresholds and tokens
    pub insights: InsightConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `GuideError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.analysis.supported_extensions.is_empty() {
            return Err(GuideError::Config(
                "analysis.supported_extensions must not be empty".to_string(),
            ));
        }

        if let Some(key) = self
            .analysis
            .supported_extensions
            .keys()
            .find(|k| !k.starts_with('.') || k.len() < 2)
        {
            return Err(GuideError::Config(format!(
                "Extension keys must start with '.', got {:?}",
                key
            )));
        }

        if self.analysis.interpreter.timeout_secs == 0 {
            return Err(GuideError::Config(
                "Interpreter timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.analysis.snippet_max_chars == 0 {
            return Err(GuideError::Config(
                "analysis.snippet_max_chars must be greater than 0".to_string(),
            ));
        }

        if self.analysis.max_tree_depth == 0 {
            return Err(GuideError::Config(
                "analysis.max_tree_depth must be greater than 0".to_string(),
            ));
        }

        if self.scoring.size_window_min >= self.scoring.size_window_max {
            return Err(GuideError::Config(format!(
                "Scoring size window is empty: ({}, {})",
                self.scoring.size_window_min, self.scoring.size_window_max
            )));
        }

        if self.scoring.key_file_limit == 0 {
            return Err(GuideError::Config(
                "scoring.key_file_limit must be greater than 0".to_string(),
            ));
        }

        if self.insights.oo_ratio <= 0.0 || self.insights.functional_ratio <= 0.0 {
            return Err(GuideError::Config(format!(
                "Insight ratios must be positive, got oo_ratio={} functional_ratio={}",
                self.insights.oo_ratio, self.insights.functional_ratio
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Walk Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Directory names that are never descended into
    #[serde(alias = "excludedDirectoryNames")]
    pub excluded_directory_names: BTreeSet<String>,

    /// Additionally skip paths matched by `.gitignore` files
    pub respect_gitignore: bool,

    /// Follow symbolic links while walking
    pub follow_links: bool,

    /// Analyze files on a rayon worker pool
    pub parallel: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            excluded_directory_names: string_set(walk::EXCLUDED_DIRECTORY_NAMES),
            respect_gitignore: false,
            follow_links: false,
            parallel: true,
        }
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// `.ext -> language` table; keys include the leading dot
    #[serde(alias = "supportedExtensions")]
    pub supported_extensions: BTreeMap<String, Language>,

    /// External interpreter strategy for Python
    pub interpreter: InterpreterConfig,

    /// Maximum characters kept in a fallback snippet
    pub snippet_max_chars: usize,

    /// Files larger than this are recorded as read failures
    pub max_file_bytes: u64,

    /// Deepest grammar tree converted to a syntax body
    pub max_tree_depth: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            supported_extensions: Language::default_extension_table(),
            interpreter: InterpreterConfig::default(),
            snippet_max_chars: analysis::SNIPPET_MAX_CHARS,
            max_file_bytes: analysis::MAX_FILE_BYTES,
            max_tree_depth: analysis::MAX_TREE_DEPTH,
        }
    }
}

impl AnalysisConfig {
    /// Language for a dotted, lowercased extension (`".ts"`)
    pub fn language_for(&self, extension: &str) -> Option<Language> {
        self.supported_extensions.get(extension).copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    pub enabled: bool,

    /// Interpreter executable
    pub python: String,

    pub timeout_secs: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            python: interpreter::DEFAULT_PYTHON.to_string(),
            timeout_secs: interpreter::DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Scoring Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub entry_point_hints: Vec<String>,
    pub entry_point_bonus: u32,
    /// Exclusive lower bound of the size window
    pub size_window_min: usize,
    /// Exclusive upper bound of the size window
    pub size_window_max: usize,
    pub size_bonus: u32,
    pub function_weight: u32,
    pub class_weight: u32,
    pub import_weight: u32,
    pub import_cap: u32,
    pub key_file_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            entry_point_hints: string_vec(scoring::ENTRY_POINT_HINTS),
            entry_point_bonus: scoring::ENTRY_POINT_BONUS,
            size_window_min: scoring::SIZE_WINDOW.0,
            size_window_max: scoring::SIZE_WINDOW.1,
            size_bonus: scoring::SIZE_BONUS,
            function_weight: scoring::FUNCTION_WEIGHT,
            class_weight: scoring::CLASS_WEIGHT,
            import_weight: scoring::IMPORT_WEIGHT,
            import_cap: scoring::IMPORT_CAP,
            key_file_limit: scoring::KEY_FILE_LIMIT,
        }
    }
}

// =============================================================================
// Insight Configuration
// =============================================================================

/// Tokens are matched case-sensitively as substrings, except
/// `api_function_token`, which ignores case
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub multi_language_threshold: usize,
    pub oo_ratio: f64,
    pub functional_ratio: f64,
    pub component_extensions: Vec<String>,
    pub state_path_tokens: Vec<String>,
    pub state_import_tokens: Vec<String>,
    pub routing_import_tokens: Vec<String>,
    pub api_path_tokens: Vec<String>,
    pub api_function_token: String,
    pub test_path_tokens: Vec<String>,
    pub config_file_tokens: Vec<String>,
    pub css_framework_tokens: Vec<String>,
    pub stylesheet_extensions: Vec<String>,
    pub feature_path_tokens: Vec<String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            multi_language_threshold: insights::MULTI_LANGUAGE_THRESHOLD,
            oo_ratio: insights::OO_RATIO,
            functional_ratio: insights::FUNCTIONAL_RATIO,
            component_extensions: string_vec(insights::COMPONENT_EXTENSIONS),
            state_path_tokens: string_vec(insights::STATE_PATH_TOKENS),
            state_import_tokens: string_vec(insights::STATE_IMPORT_TOKENS),
            routing_import_tokens: string_vec(insights::ROUTING_IMPORT_TOKENS),
            api_path_tokens: string_vec(insights::API_PATH_TOKENS),
            api_function_token: insights::API_FUNCTION_TOKEN.to_string(),
            test_path_tokens: string_vec(insights::TEST_PATH_TOKENS),
            config_file_tokens: string_vec(insights::CONFIG_FILE_TOKENS),
            css_framework_tokens: string_vec(insights::CSS_FRAMEWORK_TOKENS),
            stylesheet_extensions: string_vec(insights::STYLESHEET_EXTENSIONS),
            feature_path_tokens: string_vec(insights::FEATURE_PATH_TOKENS),
        }
    }
}
