use prometheus::{IntCounter, Opts, Registry};

/// Batch counters. Owned by the caller and passed in explicitly, so
/// independent runs never share state through the library.
#[derive(Clone)]
pub struct PipelineCounters {
    pub recordings_analyzed: IntCounter,
    pub recordings_skipped: IntCounter,
    pub repetitions_detected: IntCounter,
}

impl PipelineCounters {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            recordings_analyzed: IntCounter::with_opts(Opts::new(
                "motiongrade_recordings_analyzed_total",
                "Recordings that produced a report",
            ))?,
            recordings_skipped: IntCounter::with_opts(Opts::new(
                "motiongrade_recordings_skipped_total",
                "Recordings skipped because of malformed input",
            ))?,
            repetitions_detected: IntCounter::with_opts(Opts::new(
                "motiongrade_repetitions_detected_total",
                "Repetitions detected on active and passive sides",
            ))?,
        })
    }

    /// Registers all counters on `registry`.
    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.recordings_analyzed.clone()))?;
        registry.register(Box::new(self.recordings_skipped.clone()))?;
        registry.register(Box::new(self.repetitions_detected.clone()))?;
        Ok(())
    }
}
