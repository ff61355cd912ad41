// Pluggable translation backends
//
// Each engine turns a batch of source strings into the same number of
// translated strings, in order:
// - OpenAI: one chat-completion request per batch
// - Amazon: one Translate call per string, SigV4 signed
// - Local: one Ollama generate call per string

pub mod amazon;
pub mod local;
pub mod openai;
mod prompt;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::config::Config;
use crate::credentials::{AWS_ACCESS_KEY, AWS_SECRET_KEY, CredentialStore, OPENAI_KEY};
use crate::error::{LingoError, Result};
use crate::language::LanguageNames;

pub use prompt::clean_model_output;

/// Main trait for translation backends
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Engine identifier used in logs and credential lookups
    fn name(&self) -> &'static str;

    /// Whether empty strings may be sent to the backend
    fn accepts_empty_input(&self) -> bool;

    /// Translate `texts`, returning one translation per input in the same order
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>>;

    /// Check credentials or model availability with a lightweight call
    async fn verify(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    OpenAi,
    Amazon,
    Local,
}

impl EngineKind {
    /// Key under which the engine's credentials are stored
    pub fn id(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Amazon => "amazon",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EngineKind {
    type Err = LingoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "amazon" | "aws" => Ok(Self::Amazon),
            "local" | "ollama" | "deepseek" => Ok(Self::Local),
            _ => Err(LingoError::UnknownEngine(format!(
                "'{}'. Valid engines: openai, amazon, local",
                s
            ))),
        }
    }
}

/// Factory for creating engine instances
pub struct EngineFactory;

impl EngineFactory {
    pub fn create(
        kind: EngineKind,
        config: &Config,
        credentials: &CredentialStore,
        names: LanguageNames,
    ) -> Result<Box<dyn TranslationEngine>> {
        match kind {
            EngineKind::OpenAi => {
                let api_key = credentials.require(kind.id(), OPENAI_KEY, "OPENAI_API_KEY")?;
                Ok(Box::new(openai::OpenAiEngine::new(config.openai.clone(), api_key, names)?))
            }
            EngineKind::Amazon => {
                let access_key = credentials.require(kind.id(), AWS_ACCESS_KEY, "AWS_ACCESS_KEY_ID")?;
                let secret_key = credentials.require(kind.id(), AWS_SECRET_KEY, "AWS_SECRET_ACCESS_KEY")?;
                Ok(Box::new(amazon::AmazonEngine::new(
                    config.amazon.clone(),
                    amazon::AwsCredentials { access_key, secret_key },
                )?))
            }
            EngineKind::Local => Ok(Box::new(local::LocalEngine::new(config.local.clone(), names)?)),
        }
    }
}
