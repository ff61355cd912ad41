//! jsonlingo - Translation of text embedded in JSON documents
//!
//! Walks a JSON tree for translatable strings, sends them in batches to a
//! translation engine (OpenAI, Amazon Translate, or a local Ollama model),
//! and writes the translations back under the target language.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod document;
pub mod engine;
pub mod error;
pub mod language;
pub mod mode;
pub mod output;
pub mod patcher;
pub mod status;
pub mod walker;
pub mod workflow;
