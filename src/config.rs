//! Configuration for the flashcard pipeline

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default configuration file, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "flashcards.toml";

/// File and directory locations used by the stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding word lists and the curator history
    pub data_dir: PathBuf,
    /// Raw word list, relative to `data_dir`
    pub raw_vocab: String,
    /// Sanitized word list, relative to `data_dir`
    pub sanitized_vocab: String,
    /// Persisted review cursor, relative to `data_dir`
    pub curator_history: String,
    /// Optional `lemma<TAB>form` lexicon, relative to `data_dir`
    pub lexicon: Option<String>,
    /// Root of all generated output
    pub output_dir: PathBuf,
    /// Entry directories, relative to `output_dir`
    pub terms_dir: String,
    /// Final deck package, relative to `output_dir`
    pub deck_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            raw_vocab: "raw_vocab.txt".to_string(),
            sanitized_vocab: "sanitized_vocab.txt".to_string(),
            curator_history: "curator_history.json".to_string(),
            lexicon: None,
            output_dir: PathBuf::from("output"),
            terms_dir: "terms".to_string(),
            deck_file: "spanish_vocabulary.apkg".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn raw_vocab_path(&self) -> PathBuf {
        self.data_dir.join(&self.raw_vocab)
    }

    pub fn sanitized_vocab_path(&self) -> PathBuf {
        self.data_dir.join(&self.sanitized_vocab)
    }

    pub fn curator_history_path(&self) -> PathBuf {
        self.data_dir.join(&self.curator_history)
    }

    pub fn lexicon_path(&self) -> Option<PathBuf> {
        self.lexicon.as_ref().map(|name| self.data_dir.join(name))
    }

    pub fn terms_path(&self) -> PathBuf {
        self.output_dir.join(&self.terms_dir)
    }

    pub fn deck_path(&self) -> PathBuf {
        self.output_dir.join(&self.deck_file)
    }
}

/// Anki deck and note model identity
///
/// Both ids must stay fixed across builds so that importing a rebuilt
/// package updates the existing deck instead of creating a second one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnkiConfig {
    pub deck_name: String,
    pub deck_id: i64,
    pub model_name: String,
    pub model_id: i64,
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self {
            deck_name: "Spanish Vocabulary".to_string(),
            deck_id: 2_059_400_110,
            model_name: "Spanish Vocabulary".to_string(),
            model_id: 1_607_392_319,
        }
    }
}

/// Which language-model API the generator talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Anthropic,
    OpenAi,
}

/// Language-model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// Model name passed to the provider
    pub model: String,
    /// Sampling temperature (0-1)
    pub temperature: f64,
    /// Maximum tokens in the response
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            model: "claude-sonnet-4-20250514".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
        }
    }
}

/// Image selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Longest side of a saved image, in pixels
    pub max_dimension: u32,
    /// Number of search results offered (1-10)
    pub results: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_dimension: 800,
            results: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    /// Drop words the lexicon does not know
    pub strict_lexicon: bool,
}

/// Top-level configuration, one TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub anki: AnkiConfig,
    pub llm: LlmConfig,
    pub images: ImageConfig,
    pub sanitize: SanitizeConfig,
}

impl Config {
    /// Load configuration from a file, or defaults when the file is absent
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))?
        } else if path.is_some() {
            anyhow::bail!("Config file not found: {:?}", config_path);
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reject values the stages cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            anyhow::bail!(
                "LLM temperature must be between 0 and 1, got {}",
                self.llm.temperature
            );
        }
        if self.llm.model.trim().is_empty() {
            anyhow::bail!("LLM model name cannot be empty");
        }
        if self.images.max_dimension == 0 {
            anyhow::bail!("images.max_dimension must be positive");
        }
        if !(1..=10).contains(&self.images.results) {
            anyhow::bail!(
                "images.results must be between 1 and 10, got {}",
                self.images.results
            );
        }
        Ok(())
    }
}

/// Read a required secret from the environment
///
/// `.env` is loaded by `main` before any stage runs, so keys defined there
/// are visible here too.
pub fn required_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{} environment variable not set", name))
}
