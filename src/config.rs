use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, LingoError};

fn default_source_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language code of the text already present in input documents
    #[serde(default = "default_source_lang")]
    pub default_source_lang: String,
    pub openai: OpenAiConfig,
    pub amazon: AmazonConfig,
    pub local: LocalModelConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Base URL of the chat completions API
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmazonConfig {
    /// AWS region hosting the Translate service
    pub region: String,
    /// Override for the service URL; derived from the region when unset
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalModelConfig {
    /// Ollama endpoint URL
    pub endpoint: String,
    /// Model tag to generate with
    pub model: String,
    pub temperature: f32,
    /// Upper bound on generated tokens per string
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub general: usize,
    pub blog: usize,
    pub local: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where general mode writes its combined output file
    pub general_layout: GeneralOutputLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding credentials, language lists and logs
    pub data_dir: PathBuf,
    /// Credential side-file name, relative to the data dir
    pub credentials_file: String,
    /// Selected target languages, relative to the data dir
    pub languages_file: String,
    /// Optional JSON object mapping ISO codes to language names
    pub language_map_file: Option<PathBuf>,
}

/// Document-shape policy governing which fields are translated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationMode {
    /// General: language-keyed dicts such as `{"en": "..."}` plus `additionalContent` blocks
    General,
    /// Blog: `{"type": "text", "text": "..."}` nodes, one output file per language
    Blog,
    /// Local: detect the document shape and translate with the local batch size
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneralOutputLayout {
    /// `<name>_translated.json` next to the input
    Sibling,
    /// `Non-Blog/<name>_translated.json` next to the input
    NonBlogFolder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source_lang: default_source_lang(),
            openai: OpenAiConfig::default(),
            amazon: AmazonConfig::default(),
            local: LocalModelConfig::default(),
            batch: BatchConfig::default(),
            output: OutputConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 4000,
            timeout_secs: 120,
        }
    }
}

impl Default for AmazonConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
        }
    }
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "deepseek-coder:1.3b".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            general: 5,
            blog: 10,
            local: 3,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            general_layout: GeneralOutputLayout::Sibling,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".jsonlingo"),
            credentials_file: "api_credentials.json".to_string(),
            languages_file: "languages.json".to_string(),
            language_map_file: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LingoError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| LingoError::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LingoError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| LingoError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Batch sizes of zero would never make progress
    pub fn validate(&self) -> Result<()> {
        let batch = &self.batch;
        if batch.general == 0 || batch.blog == 0 || batch.local == 0 {
            return Err(LingoError::Config("Batch sizes must be at least 1".to_string()));
        }
        if self.default_source_lang.trim().is_empty() {
            return Err(LingoError::Config("default_source_lang must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.paths.credentials_file)
    }

    pub fn languages_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.paths.languages_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.paths.data_dir.join("log")
    }
}
