// Document-shape policies
//
// Every mode runs the same walk-collect-translate-patch pipeline and differs in:
// - General: language-keyed dicts, all languages patched into one output file
// - Blog: `type: "text"` nodes, one output file per language
// - Local: detects which of the two shapes a document uses

pub mod blog;
pub mod general;
pub mod local;

use std::str::FromStr;

use serde_json::Value;

use crate::config::{Config, TranslationMode};
use crate::error::{LingoError, Result};
use crate::walker::TextNode;

/// How translated documents are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// Every language is patched into the same document, saved after each language
    Combined,
    /// Each language is patched into a fresh copy of the source and saved separately
    PerLanguage,
}

/// Main trait for document-shape policies
pub trait ModePolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Number of texts per engine call
    fn batch_size(&self) -> usize;

    fn layout(&self) -> OutputLayout;

    /// Normalise the freshly loaded document before collection
    fn prepare(&self, document: &mut Value);

    /// Translatable locations in document order
    fn collect(&self, document: &Value, source_lang: &str) -> Vec<TextNode>;

    /// Write one language's translations into `document`.
    ///
    /// `pristine` is the prepared source document before any language was applied.
    fn apply(
        &self,
        document: &mut Value,
        pristine: &Value,
        nodes: &[TextNode],
        translations: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<()>;
}

impl FromStr for TranslationMode {
    type Err = LingoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" | "non-blog" => Ok(Self::General),
            "blog" => Ok(Self::Blog),
            "local" | "deepseek" => Ok(Self::Local),
            _ => Err(LingoError::UnknownMode(format!(
                "'{}'. Valid modes: general, blog, local",
                s
            ))),
        }
    }
}

/// Factory for creating mode policies
pub struct ModeFactory;

impl ModeFactory {
    /// Build the policy for `mode`; the local policy inspects `document` to pick its shape.
    pub fn create(mode: TranslationMode, config: &Config, document: &Value) -> Box<dyn ModePolicy> {
        match mode {
            TranslationMode::General => Box::new(general::GeneralPolicy::new(config.batch.general)),
            TranslationMode::Blog => Box::new(blog::BlogPolicy::new(config.batch.blog)),
            TranslationMode::Local => Box::new(local::LocalPolicy::detect(document, config.batch.local)),
        }
    }

    /// Name and description of every mode, for listings
    pub fn describe_all() -> Vec<(&'static str, &'static str)> {
        vec![
            (general::GeneralPolicy::NAME, general::GeneralPolicy::DESCRIPTION),
            (blog::BlogPolicy::NAME, blog::BlogPolicy::DESCRIPTION),
            (local::LocalPolicy::NAME, local::LocalPolicy::DESCRIPTION),
        ]
    }
}
