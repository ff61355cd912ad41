use serde_json::Value;

use crate::error::Result;
use crate::patcher::apply_direct;
use crate::walker::{TextNode, collect_blog};
use super::{ModePolicy, OutputLayout};

/// Blog posts: only `text` fields of `type: "text"` nodes, one file per language
pub struct BlogPolicy {
    batch_size: usize,
}

impl BlogPolicy {
    pub const NAME: &'static str = "blog";
    pub const DESCRIPTION: &'static str =
        "Blog translation: only 'text' fields where type='text', separate files per language";

    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }
}

impl ModePolicy for BlogPolicy {
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
        OutputLayout::PerLanguage
    }

    /// Blank nodes are skipped by collection and left as they are.
    fn prepare(&self, _document: &mut Value) {}

    fn collect(&self, document: &Value, _source_lang: &str) -> Vec<TextNode> {
        collect_blog(document)
    }

    fn apply(
        &self,
        document: &mut Value,
        _pristine: &Value,
        nodes: &[TextNode],
        translations: &[String],
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<()> {
        apply_direct(document, nodes, translations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn siblings_and_blank_nodes_survive() {
        let policy = BlogPolicy::new(10);
        let pristine = json!({
            "id": 3,
            "content": [
                {"type": "text", "text": "Hello", "marks": ["bold"]},
                {"type": "text", "text": ""},
                {"type": "heading", "text": "Untouched"}
            ]
        });
        let mut doc = pristine.clone();

        let nodes = policy.collect(&doc, "en");
        policy
            .apply(&mut doc, &pristine, &nodes, &["Bonjour".to_string()], "en", "fr")
            .unwrap();

        assert_eq!(
            doc,
            json!({
                "id": 3,
                "content": [
                    {"type": "text", "text": "Bonjour", "marks": ["bold"]},
                    {"type": "text", "text": ""},
                    {"type": "heading", "text": "Untouched"}
                ]
            })
        );
    }
}
