use anyhow::{Context, Result};
use lindera::dictionary::load_dictionary;
use lindera::mode::{Mode, Penalty};
use lindera::segmenter::Segmenter as LinderaInner;
use lindera::tokenizer::Tokenizer;

use crate::config::{DictionaryConfig, SegmentationMode};

/// Sentinel used by IPADIC-style dictionaries for a missing feature.
const UNKNOWN_FEATURE: &str = "*";

/// IPADIC feature index of the reading (読み).
const READING_INDEX: usize = 7;

/// One morphological unit produced by a [`Segmenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface form (表層形)
    pub surface_form: String,
    /// Reading (読み), `None` when the dictionary has no distinct reading
    pub reading: Option<String>,
}

impl Token {
    pub fn new(surface_form: impl Into<String>, reading: Option<String>) -> Self {
        Self {
            surface_form: surface_form.into(),
            reading,
        }
    }

    /// Build a token from raw dictionary features, mapping `*` and empty
    /// values to an unknown reading.
    pub fn from_features(surface_form: impl Into<String>, reading: Option<&str>) -> Self {
        let reading = reading
            .filter(|r| !r.is_empty() && *r != UNKNOWN_FEATURE)
            .map(str::to_string);
        Self::new(surface_form, reading)
    }
}

/// Splits a line of text into tokens with readings.
pub trait Segmenter {
    fn tokenize(&self, line: &str) -> Vec<Token>;
}

/// Segmenter backed by a Lindera dictionary
pub struct LinderaSegmenter {
    tokenizer: Tokenizer,
}

impl LinderaSegmenter {
    /// Load the dictionary described by `config`. Blocks while the
    /// dictionary is decoded.
    pub fn build(config: &DictionaryConfig) -> Result<Self> {
        let dictionary = load_dictionary(&config.source)
            .with_context(|| format!("Failed to load dictionary from {}", config.source))?;
        let mode = match config.mode {
            SegmentationMode::Normal => Mode::Normal,
            SegmentationMode::Decompose => Mode::Decompose(Penalty::default()),
        };
        let segmenter = LinderaInner::new(mode, dictionary, None);
        let tokenizer = Tokenizer::new(segmenter);
        Ok(Self { tokenizer })
    }

    /// Load the dictionary on the blocking thread pool.
    pub async fn build_async(config: DictionaryConfig) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::build(&config))
            .await
            .context("Dictionary loading task panicked")?
    }
}

impl Segmenter for LinderaSegmenter {
    fn tokenize(&self, line: &str) -> Vec<Token> {
        let mut tokens = match self.tokenizer.tokenize(line) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Failed to tokenize line {:?}: {}", line, e);
                return Vec::new();
            }
        };

        tokens
            .iter_mut()
            .map(|token| {
                let surface = token.surface.as_ref().to_string();
                let details = token.details();
                Token::from_features(surface, details.get(READING_INDEX).copied())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_features_unknown_reading() {
        assert_eq!(Token::from_features("ＡＢＣ", Some("*")).reading, None);
        assert_eq!(Token::from_features("ＡＢＣ", Some("")).reading, None);
        assert_eq!(Token::from_features("ＡＢＣ", None).reading, None);
    }

    #[test]
    fn test_from_features_known_reading() {
        let token = Token::from_features("東京", Some("トウキョウ"));
        assert_eq!(token.surface_form, "東京");
        assert_eq!(token.reading.as_deref(), Some("トウキョウ"));
    }

    #[test]
    fn test_lindera_tokenize_with_embedded_ipadic() {
        let segmenter = LinderaSegmenter::build(&DictionaryConfig::default()).unwrap();
        let tokens = segmenter.tokenize("東京");

        assert_eq!(tokens, vec![Token::new("東京", Some("トウキョウ".to_string()))]);
    }

    #[test]
    fn test_lindera_surfaces_cover_line() {
        let segmenter = LinderaSegmenter::build(&DictionaryConfig::default()).unwrap();
        let line = "私は本を読む";
        let tokens = segmenter.tokenize(line);

        let joined: String = tokens.iter().map(|t| t.surface_form.as_str()).collect();
        assert_eq!(joined, line);
    }

    #[test]
    fn test_build_rejects_missing_dictionary() {
        let config = DictionaryConfig {
            source: "/nonexistent/dictionary".to_string(),
            ..Default::default()
        };
        assert!(LinderaSegmenter::build(&config).is_err());
    }
}
