//! Deck configuration.
//!
//! A deck file is a small YAML document naming the stimulus sources and
//! the classification marker. CLI flags can override or replace it
//! entirely; the config layer only loads and validates.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ingest::ClassifyOptions;

fn default_sentence_marker() -> String {
    "SRT".to_string()
}

/// Deck configuration schema.
///
/// ```yaml
/// sources:
///   - stimuli/TAT_01.png
///   - stimuli/WAT_words.txt
///   - stimuli/SRT_set1.txt
/// sentence_marker: SRT
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeckConfig {
    /// Stimulus source files, resolved relative to the deck file.
    #[serde(default)]
    pub sources: Vec<PathBuf>,

    /// Substring of a source name marking sentence-fragment lists.
    #[serde(default = "default_sentence_marker")]
    pub sentence_marker: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            sentence_marker: default_sentence_marker(),
        }
    }
}

impl DeckConfig {
    /// Loads and validates a deck file, resolving relative source paths
    /// against the deck file's directory.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingFile`] when the deck file does not exist,
    /// [`ConfigError::ParseError`] on malformed YAML, or
    /// [`ConfigError::InvalidValue`] when validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        let mut config: Self =
            serde_yaml::from_str(&raw).map_err(|err| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        config.validate()?;

        if let Some(base) = path.parent() {
            for source in &mut config.sources {
                if source.is_relative() {
                    *source = base.join(&*source);
                }
            }
        }
        Ok(config)
    }

    /// Validates field values.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] when the sentence marker is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sentence_marker.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sentence_marker".to_string(),
                value: self.sentence_marker.clone(),
                expected: "a non-empty substring to match against source names".to_string(),
            });
        }
        Ok(())
    }

    /// Classifier options derived from this deck.
    #[must_use]
    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            sentence_marker: self.sentence_marker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_deck(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("deck.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_resolves_relative_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(&dir, "sources:\n  - stimuli/WAT_words.txt\n");
        let config = DeckConfig::load(&path).unwrap();
        assert_eq!(config.sources[0], dir.path().join("stimuli/WAT_words.txt"));
        assert_eq!(config.sentence_marker, "SRT");
    }

    #[test]
    fn test_load_keeps_absolute_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(&dir, "sources:\n  - /data/SRT_set1.txt\n");
        let config = DeckConfig::load(&path).unwrap();
        assert_eq!(config.sources[0], PathBuf::from("/data/SRT_set1.txt"));
    }

    #[test]
    fn test_missing_deck_file() {
        let err = DeckConfig::load(Path::new("/nonexistent/deck.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(&dir, "sources: [unclosed\n");
        let err = DeckConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(&dir, "sources: []\nshuffle: true\n");
        assert!(matches!(
            DeckConfig::load(&path).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
    }

    #[test]
    fn test_blank_marker_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(&dir, "sources: []\nsentence_marker: \"  \"\n");
        let err = DeckConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_classify_options_carry_marker() {
        let config = DeckConfig {
            sources: vec![],
            sentence_marker: "SIT".to_string(),
        };
        assert_eq!(config.classify_options().sentence_marker, "SIT");
    }
}
