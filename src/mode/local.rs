use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::walker::{DocumentShape, TextNode, detect_shape};
use super::blog::BlogPolicy;
use super::general::GeneralPolicy;
use super::{ModePolicy, OutputLayout};

/// Local-model runs: picks the general or blog rules from the document itself
pub struct LocalPolicy {
    shape: DocumentShape,
    inner: Box<dyn ModePolicy>,
}

impl LocalPolicy {
    pub const NAME: &'static str = "local";
    pub const DESCRIPTION: &'static str =
        "Local model translation: detects blog or general structure, for private offline runs";

    /// A document with any `type: "text"` node is treated as a blog post.
    pub fn detect(document: &Value, batch_size: usize) -> Self {
        let shape = detect_shape(document);
        let inner: Box<dyn ModePolicy> = match shape {
            DocumentShape::Blog => Box::new(BlogPolicy::new(batch_size)),
            DocumentShape::LanguageKeyed => Box::new(GeneralPolicy::new(batch_size)),
        };
        info!("Local mode detected {:?} document structure", shape);
        Self { shape, inner }
    }

    pub fn shape(&self) -> DocumentShape {
        self.shape
    }
}

impl ModePolicy for LocalPolicy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn batch_size(&self) -> usize {
        self.inner.batch_size()
    }

    fn layout(&self) -> OutputLayout {
        self.inner.layout()
    }

    fn prepare(&self, document: &mut Value) {
        self.inner.prepare(document)
    }

    fn collect(&self, document: &Value, source_lang: &str) -> Vec<TextNode> {
        self.inner.collect(document, source_lang)
    }

    fn apply(
        &self,
        document: &mut Value,
        pristine: &Value,
        nodes: &[TextNode],
        translations: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<()> {
        self.inner
            .apply(document, pristine, nodes, translations, source_lang, target_lang)
    }
}
