//! JSON document primitives: load/save and path addressing.

use std::fmt;
use std::path::Path;

use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{LingoError, Result};

/// One step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Ordered key/index sequence locating a value inside a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath(Vec<PathSegment>);

impl JsonPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parent path and final segment, or `None` for the root.
    pub fn split_last(&self) -> Option<(JsonPath, &PathSegment)> {
        let (last, parent) = self.0.split_last()?;
        Some((JsonPath(parent.to_vec()), last))
    }

    /// Replace the key that follows `container` when it equals `from`.
    ///
    /// Used to redirect `additionalContent.<source>` paths to the
    /// target-language copy of the same array.
    pub fn retarget_after(&self, container: &str, from: &str, to: &str) -> Self {
        let mut segments = self.0.clone();
        for i in 1..segments.len() {
            let follows_container = matches!(&segments[i - 1], PathSegment::Key(k) if k == container);
            if follows_container && matches!(&segments[i], PathSegment::Key(k) if k == from) {
                segments[i] = PathSegment::Key(to.to_string());
            }
        }
        Self(segments)
    }

    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(root, |node, segment| match (segment, node) {
            (PathSegment::Key(key), Value::Object(map)) => map.get(key),
            (PathSegment::Index(idx), Value::Array(items)) => items.get(*idx),
            _ => None,
        })
    }

    pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        let mut node = root;
        for segment in &self.0 {
            node = match (segment, node) {
                (PathSegment::Key(key), Value::Object(map)) => map.get_mut(key)?,
                (PathSegment::Index(idx), Value::Array(items)) => items.get_mut(*idx)?,
                _ => return None,
            };
        }
        Some(node)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// Load a UTF-8 JSON document.
pub async fn load_json<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LingoError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).await?;
    let value = serde_json::from_str(&content)?;
    debug!("Loaded JSON document: {}", path.display());
    Ok(value)
}

/// Save a document as UTF-8 JSON with 2-space indentation and unescaped non-ASCII.
pub async fn save_json<P: AsRef<Path>>(value: &Value, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).await?;
    info!("Saved JSON document: {}", path.display());
    Ok(())
}

fn is_blank_text(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().is_empty())
}

/// Remove whitespace-only `text` fields.
///
/// Inside objects the `text` key is dropped; inside arrays an object item whose
/// `text` is blank is dropped entirely.
pub fn strip_empty_texts(node: &mut Value) {
    match node {
        Value::Object(map) => {
            if map.get("text").is_some_and(is_blank_text) {
                map.shift_remove("text");
            }
            for value in map.values_mut() {
                if value.is_object() || value.is_array() {
                    strip_empty_texts(value);
                }
            }
        }
        Value::Array(items) => {
            items.retain(|item| !item.get("text").is_some_and(is_blank_text));
            for item in items.iter_mut() {
                if item.is_object() || item.is_array() {
                    strip_empty_texts(item);
                }
            }
        }
        _ => {}
    }
}
