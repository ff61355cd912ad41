//! Chunked dispatch of texts to a translation engine.

use tracing::{debug, info};

use crate::engine::TranslationEngine;
use crate::error::{LingoError, Result};
use crate::status::{CancelFlag, StatusSink};

/// Splits texts into fixed-size batches and sends each to an engine.
pub struct BatchDispatcher<'a> {
    engine: &'a dyn TranslationEngine,
    batch_size: usize,
    cancel: CancelFlag,
}

impl<'a> BatchDispatcher<'a> {
    pub fn new(engine: &'a dyn TranslationEngine, batch_size: usize, cancel: CancelFlag) -> Self {
        Self {
            engine,
            batch_size: batch_size.max(1),
            cancel,
        }
    }

    /// Translate `texts` in order, one engine call per batch.
    ///
    /// Blank texts never reach an engine that rejects empty input; their
    /// slots come back as `""`. Identity translation returns the input without
    /// any engine call. An engine error or a result of the wrong length aborts
    /// the whole call.
    pub async fn translate_all(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
        status: &mut dyn StatusSink,
    ) -> Result<Vec<String>> {
        if source_lang == target_lang {
            debug!("Source and target are both '{}', skipping engine", source_lang);
            return Ok(texts.to_vec());
        }

        let send_blank = self.engine.accepts_empty_input();
        let positions: Vec<usize> = (0..texts.len())
            .filter(|&i| send_blank || !texts[i].trim().is_empty())
            .collect();
        let outgoing: Vec<String> = positions.iter().map(|&i| texts[i].clone()).collect();

        let mut translated = Vec::with_capacity(outgoing.len());
        for batch in outgoing.chunks(self.batch_size) {
            if self.cancel.is_cancelled() {
                info!("Translation to {} cancelled after {} texts", target_lang, translated.len());
                return Err(LingoError::Cancelled);
            }

            let result = self.engine.translate_batch(batch, source_lang, target_lang).await?;
            if result.len() != batch.len() {
                return Err(LingoError::BatchLengthMismatch {
                    expected: batch.len(),
                    actual: result.len(),
                });
            }
            translated.extend(result);

            status.report(
                &format!(
                    "{}/{} texts translated for {}",
                    translated.len(),
                    outgoing.len(),
                    target_lang
                ),
                batch.len(),
            );
        }

        let mut output = vec![String::new(); texts.len()];
        for (position, text) in positions.into_iter().zip(translated) {
            output[position] = text;
        }
        Ok(output)
    }
}
