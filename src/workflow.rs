use std::path::{Path, PathBuf};

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::config::{Config, TranslationMode};
use crate::dispatch::BatchDispatcher;
use crate::document::{load_json, save_json};
use crate::engine::TranslationEngine;
use crate::error::{LingoError, Result};
use crate::mode::{ModeFactory, OutputLayout};
use crate::output::{blog_output_path, general_output_path, is_generated_output};
use crate::status::{CancelFlag, StatusSink};

/// One input document and the languages to translate it into
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub input: PathBuf,
    pub mode: TranslationMode,
    pub source_lang: String,
    pub target_langs: Vec<String>,
    /// Directory to write outputs under instead of the input's own directory
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    /// Number of translatable texts found in the document
    pub texts: usize,
    /// Files written, in the order they were first saved
    pub outputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub outputs: Vec<PathBuf>,
}

pub struct Workflow {
    config: Config,
    engine: Box<dyn TranslationEngine>,
    cancel: CancelFlag,
}

impl Workflow {
    pub fn new(config: Config, engine: Box<dyn TranslationEngine>, cancel: CancelFlag) -> Self {
        Self { config, engine, cancel }
    }

    pub fn engine(&self) -> &dyn TranslationEngine {
        self.engine.as_ref()
    }

    /// Translate a single JSON file into every requested language.
    ///
    /// Outputs of languages finished before a failure stay on disk.
    pub async fn translate_file(
        &self,
        request: &TranslationRequest,
        status: &mut dyn StatusSink,
    ) -> Result<TranslationSummary> {
        let span = info_span!("run", id = %Uuid::new_v4());
        self.run_file(request, status).instrument(span).await
    }

    async fn run_file(
        &self,
        request: &TranslationRequest,
        status: &mut dyn StatusSink,
    ) -> Result<TranslationSummary> {
        let input = request.input.as_path();
        let source_lang = request.source_lang.as_str();
        info!(
            "Translating {} with {} in {:?} mode",
            input.display(),
            self.engine.name(),
            request.mode
        );

        if request.target_langs.is_empty() {
            return Err(LingoError::Language("No target languages selected".to_string()));
        }

        let mut document = load_json(input).await?;
        let policy = ModeFactory::create(request.mode, &self.config, &document);
        policy.prepare(&mut document);
        let pristine = document;

        let nodes = policy.collect(&pristine, source_lang);
        if nodes.is_empty() {
            status.report("No translatable texts found.", 0);
            return Ok(TranslationSummary::default());
        }
        info!("Collected {} texts ({} mode rules)", nodes.len(), policy.name());
        let texts: Vec<String> = nodes.iter().map(|node| node.text.clone()).collect();

        let dispatcher = BatchDispatcher::new(self.engine.as_ref(), policy.batch_size(), self.cancel.clone());
        let output_dir = request.output_dir.as_deref();
        let mut summary = TranslationSummary {
            texts: nodes.len(),
            outputs: Vec::new(),
        };
        let mut combined = pristine.clone();

        for target_lang in &request.target_langs {
            // Also covers languages that send no batches
            if self.cancel.is_cancelled() {
                info!("Cancelled before translating to {}", target_lang);
                return Err(LingoError::Cancelled);
            }
            status.report(&format!("Translating to {}...", target_lang), 0);
            let translations = dispatcher
                .translate_all(&texts, source_lang, target_lang, status)
                .await?;

            let (path, translated) = match policy.layout() {
                OutputLayout::Combined => {
                    policy.apply(&mut combined, &pristine, &nodes, &translations, source_lang, target_lang)?;
                    let path = general_output_path(input, output_dir, self.config.output.general_layout)?;
                    (path, &combined)
                }
                OutputLayout::PerLanguage => {
                    let mut copy = pristine.clone();
                    policy.apply(&mut copy, &pristine, &nodes, &translations, source_lang, target_lang)?;
                    let path = blog_output_path(input, output_dir, target_lang)?;
                    save_json(&copy, &path).await?;
                    status.report(&format!("Saved translated file: {}", path.display()), 0);
                    summary.outputs.push(path);
                    continue;
                }
            };

            // The combined file is rewritten after every language
            save_json(translated, &path).await?;
            status.report(&format!("Saved translated file: {}", path.display()), 0);
            if !summary.outputs.contains(&path) {
                summary.outputs.push(path);
            }
        }

        info!("Finished {}: {} file(s) written", input.display(), summary.outputs.len());
        Ok(summary)
    }

    /// Translate every JSON file under `input_dir`, skipping files this tool generated.
    ///
    /// A failing file is logged and skipped; cancellation stops the whole batch.
    pub async fn translate_directory(
        &self,
        input_dir: &Path,
        mode: TranslationMode,
        source_lang: &str,
        target_langs: &[String],
        output_dir: Option<&Path>,
        status: &mut dyn StatusSink,
    ) -> Result<BatchSummary> {
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(LingoError::Config(format!(
                "Input path is not a directory: {}",
                input_dir.display()
            )));
        }

        let mut json_files = Vec::new();
        for entry in WalkDir::new(input_dir).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"));
            if !entry.file_type().is_file() || !is_json {
                continue;
            }
            if is_generated_output(path, input_dir) {
                debug!("Skipping generated file {}", path.display());
                continue;
            }
            json_files.push(path.to_path_buf());
        }

        info!("Found {} JSON files to translate", json_files.len());

        let mut summary = BatchSummary::default();
        for json_path in json_files {
            let file_output_dir = output_dir.map(|dir| mirrored_dir(dir, input_dir, &json_path));
            let request = TranslationRequest {
                input: json_path.clone(),
                mode,
                source_lang: source_lang.to_string(),
                target_langs: target_langs.to_vec(),
                output_dir: file_output_dir,
            };
            match self.translate_file(&request, status).await {
                Ok(result) => {
                    info!("Successfully processed: {}", json_path.display());
                    summary.processed += 1;
                    summary.outputs.extend(result.outputs);
                }
                Err(LingoError::Cancelled) => return Err(LingoError::Cancelled),
                Err(e) => {
                    warn!("Failed to process {}: {}", json_path.display(), e);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// `output_dir` plus the file's directory relative to `input_dir`
fn mirrored_dir(output_dir: &Path, input_dir: &Path, file: &Path) -> PathBuf {
    let parent = file.parent().unwrap_or(input_dir);
    match pathdiff::diff_paths(parent, input_dir) {
        Some(relative) => output_dir.join(relative),
        None => output_dir.to_path_buf(),
    }
}
