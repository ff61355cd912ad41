//! Writing translations back into a document.

use serde_json::Value;
use tracing::debug;

use crate::document::{JsonPath, PathSegment};
use crate::error::{LingoError, Result};
use crate::walker::{ADDITIONAL_CONTENT_KEY, TextNode};

fn check_lengths(nodes: &[TextNode], translations: &[String]) -> Result<()> {
    if nodes.len() != translations.len() {
        return Err(LingoError::BatchLengthMismatch {
            expected: nodes.len(),
            actual: translations.len(),
        });
    }
    Ok(())
}

fn parent_of<'a>(document: &'a mut Value, path: &JsonPath) -> Result<(&'a mut Value, PathSegment)> {
    let (parent_path, last) = path
        .split_last()
        .ok_or_else(|| LingoError::PathResolution(path.to_string()))?;
    let last = last.clone();
    let parent = parent_path
        .resolve_mut(document)
        .ok_or_else(|| LingoError::PathResolution(path.to_string()))?;
    Ok((parent, last))
}

fn assign(parent: &mut Value, last: &PathSegment, text: &str, path: &JsonPath) -> Result<()> {
    match (parent, last) {
        (Value::Object(map), PathSegment::Key(key)) => {
            map.insert(key.clone(), Value::String(text.to_string()));
            Ok(())
        }
        (Value::Array(items), PathSegment::Index(idx)) => {
            let slot = items
                .get_mut(*idx)
                .ok_or_else(|| LingoError::PathResolution(path.to_string()))?;
            *slot = Value::String(text.to_string());
            Ok(())
        }
        _ => Err(LingoError::PathResolution(path.to_string())),
    }
}

/// Patch language-keyed translations for one target language.
///
/// A path addressing a `{lang: text}` dict gets `target_lang` added, but only
/// when the dict still carries `source_lang`. Paths below
/// `additionalContent.<source_lang>` are redirected to the
/// `additionalContent.<target_lang>` copy made by [`clone_language_arrays`].
/// Anything else is a plain assignment.
pub fn apply_language_keyed(
    document: &mut Value,
    nodes: &[TextNode],
    translations: &[String],
    source_lang: &str,
    target_lang: &str,
) -> Result<()> {
    check_lengths(nodes, translations)?;

    for (node, text) in nodes.iter().zip(translations) {
        let path = node.path.retarget_after(ADDITIONAL_CONTENT_KEY, source_lang, target_lang);
        let (parent, last) = parent_of(document, &path)?;

        if let (Value::Object(map), PathSegment::Key(key)) = (&mut *parent, &last) {
            if let Some(Value::Object(lang_map)) = map.get_mut(key) {
                if lang_map.contains_key(source_lang) {
                    lang_map.insert(target_lang.to_string(), Value::String(text.clone()));
                } else {
                    debug!("Skipping {}: no '{}' entry", path, source_lang);
                }
                continue;
            }
        }
        assign(parent, &last, text, &path)?;
    }
    Ok(())
}

/// Patch blog translations: each path's value is overwritten directly.
pub fn apply_direct(document: &mut Value, nodes: &[TextNode], translations: &[String]) -> Result<()> {
    check_lengths(nodes, translations)?;

    for (node, text) in nodes.iter().zip(translations) {
        let (parent, last) = parent_of(document, &node.path)?;
        assign(parent, &last, text, &node.path)?;
    }
    Ok(())
}

/// Deep-copy every `additionalContent.<source_lang>` array to `<target_lang>`.
pub fn clone_language_arrays(node: &mut Value, source_lang: &str, target_lang: &str) {
    match node {
        Value::Object(map) => {
            if let Some(Value::Object(content)) = map.get_mut(ADDITIONAL_CONTENT_KEY) {
                if let Some(blocks) = content.get(source_lang).cloned() {
                    content.insert(target_lang.to_string(), blocks);
                }
            }
            for value in map.values_mut() {
                clone_language_arrays(value, source_lang, target_lang);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                clone_language_arrays(item, source_lang, target_lang);
            }
        }
        _ => {}
    }
}

/// Put every `additionalContent.<lang>` array back to its value in `backup`.
///
/// The walk follows `node` and `backup` in lockstep and stops wherever their
/// structures diverge.
pub fn restore_source_subtree(node: &mut Value, backup: &Value, lang: &str) {
    match (node, backup) {
        (Value::Object(map), Value::Object(saved)) => {
            for (key, value) in map.iter_mut() {
                let Some(saved_value) = saved.get(key) else {
                    continue;
                };

                if key == ADDITIONAL_CONTENT_KEY {
                    if let (Value::Object(content), Some(original)) = (&mut *value, saved_value.get(lang)) {
                        if original.is_array() && content.contains_key(lang) {
                            content.insert(lang.to_string(), original.clone());
                            continue;
                        }
                    }
                }
                restore_source_subtree(value, saved_value, lang);
            }
        }
        (Value::Array(items), Value::Array(saved)) => {
            for (item, saved_item) in items.iter_mut().zip(saved) {
                restore_source_subtree(item, saved_item, lang);
            }
        }
        _ => {}
    }
}
