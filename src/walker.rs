//! Locating translatable strings inside a document.
//!
//! Every collector walks the tree in document order and returns one
//! [`TextNode`] per translatable location. The patcher replays the same
//! paths, so collection order is part of the contract.

use serde_json::Value;

use crate::document::JsonPath;

/// Key whose value holds language-keyed arrays of structured content blocks.
pub const ADDITIONAL_CONTENT_KEY: &str = "additionalContent";

/// A translatable location and the source text found there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub path: JsonPath,
    pub text: String,
}

/// Which of the two supported document shapes a document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// Language-keyed dicts: `{"title": {"en": "Hi"}}`
    LanguageKeyed,
    /// Blog text nodes: `{"type": "text", "text": "Hi"}`
    Blog,
}

fn is_blog_text_node(node: &Value) -> bool {
    node.get("type").and_then(Value::as_str) == Some("text")
}

/// True if any object in the tree has `type == "text"`.
pub fn has_blog_nodes(node: &Value) -> bool {
    match node {
        Value::Object(map) => is_blog_text_node(node) || map.values().any(has_blog_nodes),
        Value::Array(items) => items.iter().any(has_blog_nodes),
        _ => false,
    }
}

pub fn detect_shape(document: &Value) -> DocumentShape {
    if has_blog_nodes(document) {
        DocumentShape::Blog
    } else {
        DocumentShape::LanguageKeyed
    }
}

/// Collect language-keyed strings (`{"<source_lang>": "..."}`) and the text
/// fields of `additionalContent.<source_lang>` blocks.
///
/// Empty strings are kept; the dispatcher decides whether an engine sees them.
pub fn collect_language_keyed(document: &Value, source_lang: &str) -> Vec<TextNode> {
    let mut out = Vec::new();
    walk_language_keyed(document, source_lang, &JsonPath::root(), &mut out);
    out
}

fn walk_language_keyed(node: &Value, source_lang: &str, path: &JsonPath, out: &mut Vec<TextNode>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                let child = path.key(key);
                let source_blocks = (key == ADDITIONAL_CONTENT_KEY)
                    .then(|| value.get(source_lang).and_then(Value::as_array))
                    .flatten();

                if let Some(blocks) = source_blocks {
                    let blocks_path = child.key(source_lang);
                    for (idx, block) in blocks.iter().enumerate() {
                        walk_content_block(block, &blocks_path.index(idx), out);
                    }
                } else if let Some(text) = value.get(source_lang).and_then(Value::as_str) {
                    out.push(TextNode { path: child, text: text.to_string() });
                } else {
                    walk_language_keyed(value, source_lang, &child, out);
                }
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                walk_language_keyed(item, source_lang, &path.index(idx), out);
            }
        }
        _ => {}
    }
}

/// Every string `text` field inside a structured content block, at any depth.
fn walk_content_block(node: &Value, path: &JsonPath, out: &mut Vec<TextNode>) {
    match node {
        Value::Object(map) => {
            if let Some(text) = map.get("text").and_then(Value::as_str) {
                out.push(TextNode { path: path.key("text"), text: text.to_string() });
            }
            for (key, value) in map {
                if value.is_object() || value.is_array() {
                    walk_content_block(value, &path.key(key), out);
                }
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    walk_content_block(item, &path.index(idx), out);
                }
            }
        }
        _ => {}
    }
}

/// Collect the `text` field of every `{"type": "text"}` node with non-blank text.
///
/// The collected text is trimmed; blank nodes are skipped entirely.
pub fn collect_blog(document: &Value) -> Vec<TextNode> {
    let mut out = Vec::new();
    walk_blog(document, &JsonPath::root(), &mut out);
    out
}

fn walk_blog(node: &Value, path: &JsonPath, out: &mut Vec<TextNode>) {
    match node {
        Value::Object(map) => {
            if is_blog_text_node(node) {
                if let Some(text) = map.get("text").and_then(Value::as_str) {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        out.push(TextNode { path: path.key("text"), text: trimmed.to_string() });
                    }
                }
            }
            for (key, value) in map {
                if value.is_object() || value.is_array() {
                    walk_blog(value, &path.key(key), out);
                }
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                walk_blog(item, &path.index(idx), out);
            }
        }
        _ => {}
    }
}
