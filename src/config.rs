//! Configuration management
//!
//! Handles loading and parsing of the `furigana.toml` configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::renderer::MarkupFormat;

/// Configuration file name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "furigana.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Segmentation dictionary settings
    #[serde(default)]
    pub dictionary: DictionaryConfig,

    /// Markup rendering settings
    #[serde(default)]
    pub render: RenderConfig,
}

/// Segmentation dictionary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Lindera dictionary URI or path (e.g., "embedded://ipadic")
    #[serde(default = "default_source")]
    pub source: String,

    /// Segmentation mode
    #[serde(default)]
    pub mode: SegmentationMode,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            mode: SegmentationMode::default(),
        }
    }
}

/// Lindera segmentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentationMode {
    #[default]
    Normal,
    /// Split long compounds into their parts
    Decompose,
}

/// Markup rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Output markup: "html" or "aozora"
    #[serde(default)]
    pub format: MarkupFormat,

    /// Class name of the per-word wrapper element (HTML only)
    #[serde(default = "default_word_class")]
    pub word_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: MarkupFormat::default(),
            word_class: default_word_class(),
        }
    }
}

fn default_source() -> String {
    "embedded://ipadic".to_string()
}

fn default_word_class() -> String {
    "word".to_string()
}

impl Config {
    /// Load configuration from file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "furigana")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the working directory or the user config directory
    pub fn load_from_default() -> Self {
        let workspace_path = PathBuf::from(CONFIG_FILE_NAME);
        if workspace_path.exists() {
            match Self::load(&workspace_path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Ignoring {}: {:#}", workspace_path.display(), e),
            }
        }

        if let Some(default_path) = Self::default_path() {
            match Self::load(&default_path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Ignoring {}: {:#}", default_path.display(), e),
            }
        }

        Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.dictionary.source, "embedded://ipadic");
        assert_eq!(config.dictionary.mode, SegmentationMode::Normal);
        assert_eq!(config.render.format, MarkupFormat::Html);
        assert_eq!(config.render.word_class, "word");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[render]
format = "aozora"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(config.render.format, MarkupFormat::Aozora);
        assert_eq!(config.render.word_class, "word");
        assert_eq!(config.dictionary.source, "embedded://ipadic");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[dictionary]
source = "/opt/dict/ipadic"
mode = "decompose"

[render]
format = "html"
word_class = "lyric-word"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(config.dictionary.source, "/opt/dict/ipadic");
        assert_eq!(config.dictionary.mode, SegmentationMode::Decompose);
        assert_eq!(config.render.format, MarkupFormat::Html);
        assert_eq!(config.render.word_class, "lyric-word");
    }

    #[test]
    fn test_parse_unknown_format_fails() {
        let toml_str = r#"
[render]
format = "latex"
"#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let path = PathBuf::from("/nonexistent/path/furigana.toml");
        let config = Config::load(&path).unwrap();

        assert_eq!(config.render.format, MarkupFormat::Html);
    }

    #[test]
    fn test_serialize_config() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();

        assert!(toml_str.contains("[dictionary]"));
        assert!(toml_str.contains("[render]"));
        assert!(toml_str.contains("format = \"html\""));
    }
}
