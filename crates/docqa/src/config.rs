//! Configuration for the document QA service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::generation::classifier::{ClassificationRule, QuestionKind};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "DOCQA_CONFIG";

/// Upper bound for `answer.max_retries`
pub const MAX_RETRIES: u32 = 10;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocQaConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Lexical scoring configuration
    pub scoring: ScoringConfig,
    /// Answer synthesis configuration
    pub synthesis: SynthesisConfig,
    /// Answer provider configuration
    pub answer: AnswerConfig,
}

impl DocQaConfig {
    /// Load configuration.
    ///
    /// Lookup order: `$DOCQA_CONFIG`, then `<config_dir>/docqa/config.toml`,
    /// then built-in defaults. `DOCQA_HOST` / `DOCQA_PORT` override the
    /// server address afterwards.
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            Self::from_file(Path::new(&path))?
        } else {
            match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            }
        };

        if let Ok(host) = std::env::var("DOCQA_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("DOCQA_PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid DOCQA_PORT '{}': {}", port, e)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docqa").join("config.toml"))
    }

    /// Read and validate a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be greater than 0".to_string()));
        }
        if self.scoring.top_k == 0 {
            return Err(Error::Config("scoring.top_k must be greater than 0".to_string()));
        }
        if self.scoring.length_bonus_min > self.scoring.length_bonus_max {
            return Err(Error::Config(format!(
                "scoring.length_bonus_min ({}) exceeds length_bonus_max ({})",
                self.scoring.length_bonus_min, self.scoring.length_bonus_max
            )));
        }
        let weights = [
            ("scoring.exact_match_weight", self.scoring.exact_match_weight),
            ("scoring.substring_weight", self.scoring.substring_weight),
            ("scoring.variant_weight", self.scoring.variant_weight),
            ("scoring.length_bonus", self.scoring.length_bonus),
            ("scoring.position_bonus", self.scoring.position_bonus),
        ];
        for (name, value) in weights {
            if value < 0.0 {
                return Err(Error::Config(format!("{} must not be negative", name)));
            }
        }
        for (name, value) in [
            ("scoring.min_relevance", self.scoring.min_relevance),
            ("synthesis.high_confidence_threshold", self.synthesis.high_confidence_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        if self.synthesis.title_min_len > self.synthesis.title_max_len {
            return Err(Error::Config(
                "synthesis.title_min_len exceeds title_max_len".to_string(),
            ));
        }
        if self.answer.max_retries > MAX_RETRIES {
            return Err(Error::Config(format!(
                "answer.max_retries must be at most {}, got {}",
                MAX_RETRIES, self.answer.max_retries
            )));
        }
        if self.synthesis.max_body_chunks == 0 {
            return Err(Error::Config("synthesis.max_body_chunks must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Unit the chunker splits on
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChunkGranularity {
    /// Sentences aggregated up to `chunk_size`
    #[default]
    Sentence,
    /// One chunk per blank-line separated paragraph
    Paragraph,
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Sentence aggregation or paragraph splitting
    pub granularity: ChunkGranularity,
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Sentences (or paragraphs) shorter than this are dropped as noise
    pub min_sentence_len: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            granularity: ChunkGranularity::Sentence,
            chunk_size: 300,
            min_sentence_len: 10,
        }
    }
}

/// Lexical relevance scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Query tokens shorter than this are ignored
    pub min_token_len: usize,
    /// Chunks must score strictly above this to be returned
    pub min_relevance: f32,
    /// Number of ranked chunks returned
    pub top_k: usize,
    /// Per whole-word occurrence
    pub exact_match_weight: f32,
    /// Flat, when the token occurs anywhere
    pub substring_weight: f32,
    /// Flat, per inflected variant found
    pub variant_weight: f32,
    /// Inflectional endings appended to a token to form variants
    pub variant_suffixes: Vec<String>,
    /// Bonus for chunks of a readable size
    pub length_bonus: f32,
    /// Inclusive lower bound (characters) for the length bonus
    pub length_bonus_min: usize,
    /// Inclusive upper bound (characters) for the length bonus
    pub length_bonus_max: usize,
    /// Bonus for the first chunk, decaying linearly to 0 at the end
    pub position_bonus: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_token_len: 3,
            min_relevance: 0.01,
            top_k: 5,
            exact_match_weight: 0.5,
            substring_weight: 0.2,
            variant_weight: 0.05,
            variant_suffixes: ["s", "es", "ed", "ing", "а", "ы", "у", "е", "ом", "ой", "ах", "ов"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            length_bonus: 0.1,
            length_bonus_min: 100,
            length_bonus_max: 500,
            position_bonus: 0.1,
        }
    }
}

/// Answer synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Chunks above this score may be combined in one answer
    pub high_confidence_threshold: f32,
    /// Maximum chunks combined in the answer body
    pub max_body_chunks: usize,
    /// How many leading document chunks are scanned for a title
    pub title_scan_chunks: usize,
    /// Minimum title length in characters
    pub title_min_len: usize,
    /// Maximum title length in characters
    pub title_max_len: usize,
    /// Chunks containing any of these are never taken as a title
    pub boilerplate_markers: Vec<String>,
    /// Ordered question classification rules, first match wins
    pub rules: Vec<ClassificationRule>,
    /// Prefix for questions no rule matched
    pub generic_template: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: 0.3,
            max_body_chunks: 2,
            title_scan_chunks: 3,
            title_min_len: 10,
            title_max_len: 200,
            boilerplate_markers: [
                "abstract",
                "introduction",
                "keywords",
                "аннотация",
                "введение",
                "ключевые слова",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            rules: default_rules(),
            generic_template: "Information found for your query:\n\n".to_string(),
        }
    }
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Built-in classification table: title, author, abstract, conclusion
pub fn default_rules() -> Vec<ClassificationRule> {
    vec![
        ClassificationRule {
            kind: QuestionKind::Title,
            keywords: keywords(&[
                "title", "heading", "called", "название", "заголовок", "заглавие", "называется",
            ]),
            template: "Title of the document: \"{title}\"\n\n".to_string(),
        },
        ClassificationRule {
            kind: QuestionKind::Author,
            keywords: keywords(&["author", "written by", "who wrote", "автор", "кто написал"]),
            template: "Information about the author:\n\n".to_string(),
        },
        ClassificationRule {
            kind: QuestionKind::Abstract,
            keywords: keywords(&[
                "abstract", "summary", "summarize", "overview", "аннотац", "резюме", "кратко",
                "о чем", "о чём",
            ]),
            template: "Summary of the document:\n\n".to_string(),
        },
        ClassificationRule {
            kind: QuestionKind::Conclusion,
            keywords: keywords(&["conclusion", "conclude", "findings", "вывод", "заключени", "итог"]),
            template: "Conclusions of the document:\n\n".to_string(),
        },
    ]
}

/// Which provider writes the final answer text
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnswerBackend {
    /// Lexical synthesizer, no network
    #[default]
    Local,
    /// OpenAI-compatible chat completions API
    OpenAi,
}

/// Answer provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Provider selection
    pub backend: AnswerBackend,
    /// API base URL (without `/chat/completions`)
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens in the generated answer
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
    /// Ranked chunks sent as context
    pub context_chunks: usize,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            backend: AnswerBackend::Local,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.3, // Lower for more factual answers
            max_tokens: 1000,
            timeout_secs: 60,
            max_retries: 2,
            context_chunks: 5,
        }
    }
}
