use std::path::Path;
use std::sync::{Arc, Mutex};

use assert_fs::TempDir;
use assert_fs::prelude::*;
use async_trait::async_trait;
use serde_json::{Value, json};

use jsonlingo::config::{Config, GeneralOutputLayout, TranslationMode};
use jsonlingo::engine::{EngineKind, TranslationEngine};
use jsonlingo::error::{LingoError, Result};
use jsonlingo::status::{CancelFlag, LogStatus};
use jsonlingo::workflow::{TranslationRequest, Workflow};

/// Prefixes every text with its target language and records each batch.
#[derive(Clone, Default)]
struct FakeEngine {
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    fail_for: Option<String>,
    strict: bool,
}

impl FakeEngine {
    fn strict() -> Self {
        Self { strict: true, ..Self::default() }
    }

    fn failing_for(lang: &str) -> Self {
        Self { fail_for: Some(lang.to_string()), ..Self::default() }
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationEngine for FakeEngine {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn accepts_empty_input(&self) -> bool {
        !self.strict
    }

    async fn translate_batch(&self, texts: &[String], _source_lang: &str, target_lang: &str) -> Result<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .push((target_lang.to_string(), texts.to_vec()));
        if self.fail_for.as_deref() == Some(target_lang) {
            return Err(LingoError::Engine(format!("backend unavailable for {}", target_lang)));
        }
        Ok(texts
            .iter()
            .map(|t| if t.is_empty() { String::new() } else { format!("[{}] {}", target_lang, t) })
            .collect())
    }

    async fn verify(&self) -> Result<()> {
        Ok(())
    }
}

fn workflow(engine: &FakeEngine, config: Config) -> Workflow {
    Workflow::new(config, Box::new(engine.clone()), CancelFlag::new())
}

fn request(input: &Path, mode: TranslationMode, targets: &[&str]) -> TranslationRequest {
    TranslationRequest {
        input: input.to_path_buf(),
        mode,
        source_lang: "en".to_string(),
        target_langs: targets.iter().map(|t| t.to_string()).collect(),
        output_dir: None,
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn blog_post_gets_one_file_per_language() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("launch.json");
    input
        .write_str(r#"{"slug": "launch", "content": [{"type": "text", "text": "Hello", "marks": ["bold"]}]}"#)
        .unwrap();

    let engine = FakeEngine::default();
    let summary = workflow(&engine, Config::default())
        .translate_file(&request(input.path(), TranslationMode::Blog, &["fr", "es"]), &mut |_: &str, _: usize| {})
        .await
        .unwrap();

    assert_eq!(summary.texts, 1);
    assert_eq!(
        read_json(&temp.path().join("Blog/fr_launch.json")),
        json!({"slug": "launch", "content": [{"type": "text", "text": "[fr] Hello", "marks": ["bold"]}]})
    );
    assert_eq!(
        read_json(&temp.path().join("Blog/es_launch.json"))["content"][0]["text"],
        json!("[es] Hello")
    );
    // The source file is never modified
    assert_eq!(read_json(input.path())["content"][0]["text"], json!("Hello"));
}

#[tokio::test]
async fn general_document_collects_all_languages_in_one_file() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("page.json");
    input.write_str(r#"{"title": {"en": "Hi"}}"#).unwrap();

    let engine = FakeEngine::default();
    let mut messages = Vec::new();
    let mut sink = |message: &str, _: usize| messages.push(message.to_string());
    let summary = workflow(&engine, Config::default())
        .translate_file(&request(input.path(), TranslationMode::General, &["ar", "fr"]), &mut sink)
        .await
        .unwrap();

    let output = temp.path().join("page_translated.json");
    assert_eq!(summary.outputs, vec![output.clone()]);
    assert_eq!(
        read_json(&output),
        json!({"title": {"en": "Hi", "ar": "[ar] Hi", "fr": "[fr] Hi"}})
    );
    assert_eq!(messages.first().map(String::as_str), Some("Translating to ar..."));
    assert!(messages.iter().any(|m| m.starts_with("Saved translated file:")));
}

#[tokio::test]
async fn non_blog_folder_layout() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("page.json");
    input.write_str(r#"{"title": {"en": "Hi"}}"#).unwrap();

    let mut config = Config::default();
    config.output.general_layout = GeneralOutputLayout::NonBlogFolder;
    workflow(&FakeEngine::default(), config)
        .translate_file(&request(input.path(), TranslationMode::General, &["ar"]), &mut LogStatus)
        .await
        .unwrap();

    assert!(temp.child("Non-Blog/page_translated.json").path().exists());
}

#[tokio::test]
async fn empty_texts_round_trip_without_reaching_strict_engine() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("page.json");
    input
        .write_str(r#"{"title": {"en": "Hi"}, "subtitle": {"en": ""}}"#)
        .unwrap();

    let engine = FakeEngine::strict();
    workflow(&engine, Config::default())
        .translate_file(&request(input.path(), TranslationMode::General, &["ar"]), &mut |_: &str, _: usize| {})
        .await
        .unwrap();

    assert_eq!(
        read_json(&temp.path().join("page_translated.json")),
        json!({"title": {"en": "Hi", "ar": "[ar] Hi"}, "subtitle": {"en": "", "ar": ""}})
    );
    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.iter().all(|t| !t.trim().is_empty()));
}

#[tokio::test]
async fn identity_translation_reproduces_the_document() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("page.json");
    input
        .write_str(
            r#"{"title": {"en": "Hi"}, "additionalContent": {"en": [{"type": "p", "text": "Body"}, {"type": "p", "text": " "}]}}"#,
        )
        .unwrap();

    let engine = FakeEngine::default();
    workflow(&engine, Config::default())
        .translate_file(&request(input.path(), TranslationMode::General, &["en"]), &mut |_: &str, _: usize| {})
        .await
        .unwrap();

    assert!(engine.calls().is_empty());
    assert_eq!(
        read_json(&temp.path().join("page_translated.json")),
        json!({"title": {"en": "Hi"}, "additionalContent": {"en": [{"type": "p", "text": "Body"}]}})
    );
}

#[tokio::test]
async fn document_without_texts_is_a_no_op() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("data.json");
    input.write_str(r#"{"id": 7, "tags": ["a", "b"]}"#).unwrap();

    let engine = FakeEngine::default();
    let mut messages = Vec::new();
    let mut sink = |message: &str, _: usize| messages.push(message.to_string());
    let summary = workflow(&engine, Config::default())
        .translate_file(&request(input.path(), TranslationMode::General, &["fr"]), &mut sink)
        .await
        .unwrap();

    assert_eq!(summary.texts, 0);
    assert!(summary.outputs.is_empty());
    assert_eq!(messages, vec!["No translatable texts found.".to_string()]);
    assert!(!temp.child("data_translated.json").path().exists());
}

#[tokio::test]
async fn engine_failure_keeps_earlier_languages_on_disk() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("post.json");
    input
        .write_str(r#"{"content": [{"type": "text", "text": "Hello"}]}"#)
        .unwrap();

    let engine = FakeEngine::failing_for("fr");
    let err = workflow(&engine, Config::default())
        .translate_file(&request(input.path(), TranslationMode::Blog, &["ar", "fr", "es"]), &mut |_: &str, _: usize| {})
        .await
        .unwrap_err();

    assert!(matches!(err, LingoError::Engine(_)));
    assert!(temp.child("Blog/ar_post.json").path().exists());
    assert!(!temp.child("Blog/fr_post.json").path().exists());
    assert!(!temp.child("Blog/es_post.json").path().exists());
    // Nothing is attempted after the failing language
    assert_eq!(engine.calls().len(), 2);
}

#[tokio::test]
async fn local_mode_detects_blog_shape_and_uses_small_batches() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("post.json");
    let blocks: Vec<Value> = (0..7)
        .map(|i| json!({"type": "text", "text": format!("Line {}", i)}))
        .collect();
    input.write_str(&json!({"blocks": blocks}).to_string()).unwrap();

    let engine = FakeEngine::default();
    workflow(&engine, Config::default())
        .translate_file(&request(input.path(), TranslationMode::Local, &["fr"]), &mut |_: &str, _: usize| {})
        .await
        .unwrap();

    let sizes: Vec<usize> = engine.calls().iter().map(|(_, batch)| batch.len()).collect();
    assert_eq!(sizes, vec![3, 3, 1]);
    assert_eq!(
        read_json(&temp.path().join("Blog/fr_post.json"))["blocks"][6]["text"],
        json!("[fr] Line 6")
    );
}

#[tokio::test]
async fn missing_input_fails_fast() {
    let temp = TempDir::new().unwrap();
    let engine = FakeEngine::default();
    let err = workflow(&engine, Config::default())
        .translate_file(
            &request(&temp.path().join("absent.json"), TranslationMode::General, &["fr"]),
            &mut |_: &str, _: usize| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, LingoError::FileNotFound(_)));
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn directory_batch_skips_generated_files_and_survives_bad_input() {
    let temp = TempDir::new().unwrap();
    temp.child("a.json").write_str(r#"{"title": {"en": "A"}}"#).unwrap();
    temp.child("sub/b.json").write_str(r#"{"title": {"en": "B"}}"#).unwrap();
    temp.child("c.json").write_str("{not json").unwrap();
    temp.child("old_translated.json").write_str(r#"{"title": {"en": "Old"}}"#).unwrap();
    temp.child("Blog/fr_post.json").write_str(r#"{"title": {"en": "Post"}}"#).unwrap();

    let engine = FakeEngine::default();
    let targets = vec!["fr".to_string()];
    let summary = workflow(&engine, Config::default())
        .translate_directory(
            temp.path(),
            TranslationMode::General,
            "en",
            &targets,
            None,
            &mut |_: &str, _: usize| {},
        )
        .await
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);
    assert!(temp.child("a_translated.json").path().exists());
    assert!(temp.child("sub/b_translated.json").path().exists());
    assert!(!temp.child("old_translated_translated.json").path().exists());
    assert_eq!(engine.calls().len(), 2);
}

#[tokio::test]
async fn cancelled_batch_stops_before_any_file() {
    let temp = TempDir::new().unwrap();
    temp.child("a.json").write_str(r#"{"title": {"en": "A"}}"#).unwrap();
    temp.child("b.json").write_str(r#"{"title": {"en": "B"}}"#).unwrap();

    let engine = FakeEngine::default();
    let cancel = CancelFlag::new();
    cancel.cancel();
    let err = Workflow::new(Config::default(), Box::new(engine.clone()), cancel)
        .translate_directory(
            temp.path(),
            TranslationMode::General,
            "en",
            &["fr".to_string()],
            None,
            &mut |_: &str, _: usize| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, LingoError::Cancelled));
    assert!(engine.calls().is_empty());
    assert!(!temp.child("a_translated.json").path().exists());
    assert!(!temp.child("b_translated.json").path().exists());
}

#[tokio::test]
async fn cancellation_applies_to_languages_without_engine_calls() {
    let temp = TempDir::new().unwrap();
    let input = temp.child("page.json");
    input.write_str(r#"{"title": {"en": "Hi"}}"#).unwrap();

    let cancel = CancelFlag::new();
    cancel.cancel();
    let err = Workflow::new(Config::default(), Box::new(FakeEngine::default()), cancel)
        .translate_file(&request(input.path(), TranslationMode::General, &["en"]), &mut |_: &str, _: usize| {})
        .await
        .unwrap_err();

    assert!(matches!(err, LingoError::Cancelled));
    assert!(!temp.child("page_translated.json").path().exists());
}

#[test]
fn unknown_engine_is_rejected() {
    let err = "babelfish".parse::<EngineKind>().unwrap_err();
    assert!(matches!(err, LingoError::UnknownEngine(_)));
}
