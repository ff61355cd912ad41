use serde_json::Value;

use crate::document::strip_empty_texts;
use crate::error::Result;
use crate::patcher::{apply_language_keyed, clone_language_arrays, restore_source_subtree};
use crate::walker::{TextNode, collect_language_keyed};
use super::{ModePolicy, OutputLayout};

/// Language-keyed documents; every target language ends up in one file
pub struct GeneralPolicy {
    batch_size: usize,
}

impl GeneralPolicy {
    pub const NAME: &'static str = "general";
    pub const DESCRIPTION: &'static str =
        "General JSON translation: nested structures with language-keyed fields and additionalContent blocks";

    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }
}

impl ModePolicy for GeneralPolicy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn layout(&self) -> OutputLayout {
        OutputLayout::Combined
    }

    fn prepare(&self, document: &mut Value) {
        strip_empty_texts(document);
    }

    fn collect(&self, document: &Value, source_lang: &str) -> Vec<TextNode> {
        collect_language_keyed(document, source_lang)
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
        // Content blocks are translated in the target copy, never in place
        clone_language_arrays(document, source_lang, target_lang);
        apply_language_keyed(document, nodes, translations, source_lang, target_lang)?;
        restore_source_subtree(document, pristine, source_lang);
        strip_empty_texts(document);
        Ok(())
    }
}
