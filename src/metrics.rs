// Metrics hooks for the document scorer.
//
// Callers install a global `ScoringMetrics` implementation via
// [`set_scoring_metrics`]; every `DocumentScorer` then reports latency and
// outcome for document initialization, step estimation and commits.
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use crate::ScorerError;

/// Metrics observer for scoring operations.
pub trait ScoringMetrics: Send + Sync {
    /// A document was initialized with `sentences` sentences.
    fn record_init(&self, latency: Duration, sentences: usize);

    /// A search step of `modifications` edits was estimated.
    fn record_estimate(
        &self,
        latency: Duration,
        modifications: usize,
        result: Result<(), ScorerError>,
    );

    /// A candidate was committed or refused.
    fn record_commit(&self, latency: Duration, result: Result<(), ScorerError>);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn ScoringMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn ScoringMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn ScoringMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global scoring metrics recorder.
pub fn set_scoring_metrics(recorder: Option<Arc<dyn ScoringMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn ScoringMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_init(self, sentences: usize) {
        self.recorder.record_init(self.start.elapsed(), sentences);
    }

    pub(crate) fn record_estimate(self, modifications: usize, result: Result<(), ScorerError>) {
        self.recorder
            .record_estimate(self.start.elapsed(), modifications, result);
    }

    pub(crate) fn record_commit(self, result: Result<(), ScorerError>) {
        self.recorder.record_commit(self.start.elapsed(), result);
    }
}
