//! Progress reporting and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Receives a human-readable message and the number of texts just processed.
///
/// Called after every batch and at milestones (language start, file saved),
/// where `batch_count` is 0.
pub trait StatusSink: Send {
    fn report(&mut self, message: &str, batch_count: usize);
}

impl<F> StatusSink for F
where
    F: FnMut(&str, usize) + Send,
{
    fn report(&mut self, message: &str, batch_count: usize) {
        self(message, batch_count)
    }
}

/// Sink that only logs.
#[derive(Debug, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn report(&mut self, message: &str, _batch_count: usize) {
        info!("{}", message);
    }
}

/// Terminal progress display; batch counts advance the bar.
pub struct ProgressStatus {
    bar: ProgressBar,
}

impl ProgressStatus {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} texts {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for ProgressStatus {
    fn report(&mut self, message: &str, batch_count: usize) {
        self.bar.inc(batch_count as u64);
        self.bar.set_message(message.to_string());
        info!("{}", message);
    }
}

/// Flag polled between batches; an in-flight engine call is never interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
