//! MotionGrade core: turns two-sided IMU recordings of a foot stomp/tapping
//! exercise into per-side repetition metrics, a left/right asymmetry summary
//! and a 0–4 severity grade with confidence.
//!
//! Stages, in pipeline order: [`trimming`] → [`signal`] → [`peaks`] →
//! [`metrics`] → [`asymmetry`] + [`severity`], wired together in
//! [`pipeline`]. Not a medical device.

pub mod api;
pub mod asymmetry;
pub mod baseline;
pub mod batch;
pub mod error;
pub mod metrics;
pub mod models;
pub mod peaks;
pub mod pipeline;
pub mod severity;
pub mod signal;
pub(crate) mod stats;
pub mod storage;
pub mod telemetry;
pub mod trimming;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use asymmetry::asymmetry;
pub use batch::{analyze_batch, BatchOutcome, CanonicalDocument, ResultsTable};
pub use error::MotionError;
pub use metrics::extract;
pub use models::{
    Exercise, MagnitudePoint, MagnitudeSeries, MagnitudeSource, Peak, PeakSet, Recording, Sample, Side,
    SideSeries, Vec3,
};
pub use peaks::{detect_peaks, dynamic_prominence};
pub use pipeline::{analyze_recording, analyze_recording_detailed, analyze_side, RecordingAnalysis, SideAnalysis};
pub use severity::{classify, Feature, SeverityAssessment, SeverityBand, SeverityCalibration, SeverityFeatures};
pub use signal::{normalize, select_active_side};
pub use storage::{load_calibration, load_params, save_calibration, save_params};
pub use trimming::{trim, trim_inactivity};
pub use types::{
    AsymmetryResult, MovementMetrics, PeakParams, PipelineParams, RecordingReport, TimeUnit, VerticalAxis,
};
