//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Project config (`.repoguide.toml` in the working directory)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables (`REPOGUIDE_*`, nested keys split on `__`)

use std::path::{Path, PathBuf};

use figment::{
    Figment, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Value},
};
use tracing::debug;

use super::types::Config;
use crate::constants::walk::PROJECT_CONFIG_FILE;
use crate::types::{GuideError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → project → explicit file → env vars
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        Self::load_from(&Self::project_config_path(), explicit)
    }

    /// Resolution chain with a caller-chosen project file
    pub fn load_from(project_path: &Path, explicit: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(file_provider(project_path)?);
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(GuideError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(file_provider(path)?);
        }

        // e.g. REPOGUIDE_SCORING__KEY_FILE_LIMIT -> scoring.key_file_limit
        figment = figment.merge(Env::prefixed("REPOGUIDE_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| GuideError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(file_provider(path)?)
            .extract()
            .map_err(|e| GuideError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG_FILE)
    }
}

/// camelCase spellings accepted in config files: (section, alias, field)
const KEY_ALIASES: &[(&str, &str, &str)] = &[
    ("walk", "excludedDirectoryNames", "excluded_directory_names"),
    ("analysis", "supportedExtensions", "supported_extensions"),
];

/// A TOML file as a provider, with aliased keys renamed to their field names.
///
/// The defaults already carry the snake_case keys, so an alias left in place
/// would reach serde as a duplicate field.
fn file_provider(path: &Path) -> Result<Serialized<Dict>> {
    let mut dict = Figment::from(Toml::file(path))
        .data()
        .map_err(|e| GuideError::Config(format!("Configuration error: {}", e)))?
        .remove(&Profile::Default)
        .unwrap_or_default();

    for (section, alias, field) in KEY_ALIASES {
        if let Some(Value::Dict(_, table)) = dict.get_mut(*section)
            && let Some(value) = table.remove(*alias)
        {
            table.insert(field.to_string(), value);
        }
    }

    Ok(Serialized::defaults(dict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::parser::Language;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            ConfigLoader::load_from(&temp_dir.path().join(PROJECT_CONFIG_FILE), None).unwrap();
        assert_eq!(config.scoring.entry_point_bonus, 50);
        assert!(config.walk.parallel);
    }

    #[test]
    fn test_project_then_explicit_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join(PROJECT_CONFIG_FILE);
        fs::write(
            &project,
            "[scoring]\nkey_file_limit = 3\nentry_point_bonus = 70\n",
        )
        .unwrap();
        let explicit = temp_dir.path().join("custom.toml");
        fs::write(
            &explicit,
            "[scoring]\nkey_file_limit = 5\n\n[analysis.supported_extensions]\n\".mjs\" = \"javascript\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from(&project, Some(&explicit)).unwrap();
        assert_eq!(config.scoring.key_file_limit, 5);
        assert_eq!(config.scoring.entry_point_bonus, 70);
        assert_eq!(
            config.analysis.language_for(".mjs"),
            Some(Language::JavaScript)
        );
        // merged maps keep the built-in entries
        assert_eq!(config.analysis.language_for(".ts"), Some(Language::TypeScript));
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = ConfigLoader::load_from(
            &temp_dir.path().join(PROJECT_CONFIG_FILE),
            Some(&temp_dir.path().join("absent.toml")),
        )
        .unwrap_err();
        assert!(matches!(err, GuideError::Config(_)));
    }

    #[test]
    fn test_camel_case_keys_in_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("camel.toml");
        fs::write(
            &path,
            "[walk]\nexcludedDirectoryNames = [\"vendor\"]\n\n[analysis.supportedExtensions]\n\".mjs\" = \"javascript\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.walk.excluded_directory_names.len(), 1);
        assert!(config.walk.excluded_directory_names.contains("vendor"));
        assert_eq!(
            config.analysis.language_for(".mjs"),
            Some(Language::JavaScript)
        );
        assert_eq!(config.analysis.language_for(".py"), Some(Language::Python));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[analysis.interpreter]\ntimeout_secs = 0\n").unwrap();
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}
