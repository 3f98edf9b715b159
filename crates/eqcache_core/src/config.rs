//! Resolver configuration.

use std::fs;
use std::path::{Path, PathBuf};

use eqcache_engine::{EngineOptions, OutputMode};
use eqcache_store::EquationStore;
use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::EquationError;

/// Configuration file names, in lookup order.
pub const CONFIG_FILES: [&str; 2] = [".eqcache.jsonc", ".eqcache.json"];

/// Configuration for the equation cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Output produced for equations.
    #[serde(default)]
    pub output: OutputMode,

    /// Cache file. Relative paths are resolved against `base_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,

    /// Whether HTML output carries the source in a hidden node.
    #[serde(default = "default_input_text")]
    pub input_text: bool,

    /// Whether failed renders are written to the cache file.
    #[serde(default)]
    pub persist_failures: bool,

    /// Engine launch options.
    #[serde(default)]
    pub engine: EngineOptions,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_input_text() -> bool {
    true
}

impl ResolverConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            output: OutputMode::default(),
            cache_file: None,
            input_text: default_input_text(),
            persist_failures: false,
            engine: EngineOptions::default(),
            base_dir: None,
        }
    }

    /// Finds a configuration file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.eqcache.jsonc`, `.eqcache.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EquationError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| EquationError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON (or JSONC) string.
    pub fn from_json(json: &str) -> Result<Self, EquationError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| EquationError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        serde_json::from_value(value)
            .map_err(|e| EquationError::config(format!("Invalid config: {}", e)))
    }

    /// Returns the cache file location.
    pub fn cache_path(&self) -> Result<PathBuf, EquationError> {
        match &self.cache_file {
            Some(path) if path.is_relative() => Ok(match &self.base_dir {
                Some(base) => base.join(path),
                None => path.clone(),
            }),
            Some(path) => Ok(path.clone()),
            None => Ok(EquationStore::default_path()?),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn test_config_new() {
        let config = ResolverConfig::new();
        assert_eq!(config.output, OutputMode::Svg);
        assert!(config.input_text);
        assert!(!config.persist_failures);
        assert!(config.cache_file.is_none());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "output": "html",
            "cache_file": "build/equations.json",
            "input_text": false,
            "engine": { "program": "mjx", "timeout_ms": 2000 }
        }"#;

        let config = ResolverConfig::from_json(json).unwrap();
        assert_eq!(config.output, OutputMode::Html);
        assert_eq!(config.cache_file, Some(PathBuf::from("build/equations.json")));
        assert!(!config.input_text);
        assert_eq!(config.engine.program.as_deref(), Some("mjx"));
        assert_eq!(config.engine.timeout_ms, Some(2000));
        assert!(config.engine.packages.is_empty());
    }

    #[test]
    fn test_config_from_jsonc() {
        let json = r#"{
            // render to CommonHTML
            "output": "html", /* trailing */
        }"#;

        let config = ResolverConfig::from_json(json).unwrap();
        assert_eq!(config.output, OutputMode::Html);
    }

    #[test]
    fn test_config_empty_document() {
        let config = ResolverConfig::from_json("").unwrap();
        assert_eq!(config, ResolverConfig::new());
    }

    #[rstest]
    #[case::unknown_property(r#"{ "outputs": "svg" }"#, "Invalid config")]
    #[case::type_mismatch(r#"{ "input_text": "yes" }"#, "Invalid config")]
    #[case::unknown_mode(r#"{ "output": "png" }"#, "Invalid config")]
    #[case::syntax(r#"{ "output": "#, "Invalid JSON")]
    fn test_config_errors(#[case] json: &str, #[case] expected: &str) {
        let err = ResolverConfig::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_from_file_sets_base_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".eqcache.json");
        fs::write(&path, r#"{ "cache_file": "eq.json" }"#).unwrap();

        let config = ResolverConfig::from_file(&path).unwrap();
        assert_eq!(config.base_dir.as_deref(), Some(dir.path()));
        assert_eq!(config.cache_path().unwrap(), dir.path().join("eq.json"));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempdir().unwrap();
        let err = ResolverConfig::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, EquationError::Config(_)));
    }

    #[test]
    fn test_cache_path_absolute() {
        let dir = tempdir().unwrap();
        let config = ResolverConfig {
            cache_file: Some(dir.path().join("abs.json")),
            base_dir: Some(PathBuf::from("/elsewhere")),
            ..Default::default()
        };
        assert_eq!(config.cache_path().unwrap(), dir.path().join("abs.json"));
    }

    #[test]
    fn test_discover_prefers_jsonc() {
        let dir = tempdir().unwrap();
        assert!(ResolverConfig::discover(dir.path()).is_none());

        fs::write(dir.path().join(".eqcache.json"), "{}").unwrap();
        assert_eq!(
            ResolverConfig::discover(dir.path()),
            Some(dir.path().join(".eqcache.json"))
        );

        fs::write(dir.path().join(".eqcache.jsonc"), "{}").unwrap();
        assert_eq!(
            ResolverConfig::discover(dir.path()),
            Some(dir.path().join(".eqcache.jsonc"))
        );
    }
}
