use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// Orchestrator states, reported to the logger on each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Uploaded,
    SizeCheck,
    SinglePass,
    ChunkedPass,
    Normalized,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Uploaded => "uploaded",
            PipelineStage::SizeCheck => "size check",
            PipelineStage::SinglePass => "single pass",
            PipelineStage::ChunkedPass => "chunked pass",
            PipelineStage::Normalized => "normalized",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Cross-cutting logger for pipeline orchestration events.
///
/// Keeps the use case independent of where progress ends up (log crate,
/// a UI, or nowhere in tests).
pub trait PipelineLogger: Send {
    /// Report a state transition.
    fn stage(&mut self, stage: PipelineStage);

    /// Report chunk-level progress (1-based `current`).
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long one call of a named stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. characters transcribed per chunk).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn stage(&mut self, _stage: PipelineStage) {}
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger that forwards events to the `log` crate and keeps per-stage
/// timings and metrics for a summary at the end of the run.
pub struct LogPipelineLogger {
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_chunks: usize,
}

impl LogPipelineLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            total_chunks: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if nothing was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Pipeline summary ({} chunk(s), {:.1}s total):",
            self.total_chunks.max(1),
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let calls = durations.len();
            let avg_ms = if calls == 0 { 0.0 } else { total_ms / calls as f64 };
            lines.push(format!(
                "  {stage:12}: {calls:3} call(s)  avg {avg_ms:8.1}ms  total {total_ms:9.0}ms"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let total: f64 = values.iter().sum();
            lines.push(format!("  {name}: total {total:.0}"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn stage(&mut self, stage: PipelineStage) {
        log::debug!("Pipeline stage: {stage}");
    }

    fn progress(&mut self, current: usize, total: usize) {
        self.total_chunks = total;
        if total > 0 {
            log::info!("Processing chunk {current}/{total}");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
