use thiserror::Error;

/// Failures the pipeline surfaces to its caller.
///
/// Short recordings are not an error: metrics that cannot be derived come
/// back as `None` instead.
#[derive(Debug, Error)]
pub enum MotionError {
    /// A document or sample could not be turned into the canonical form.
    #[error("malformed input in {source_name}: {detail}")]
    MalformedInput { source_name: String, detail: String },

    /// A tunable or calibration value was rejected at configuration time.
    #[error("invalid parameter: {0}")]
    Parameter(String),
}

impl MotionError {
    pub fn malformed(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        MotionError::MalformedInput {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }

    pub fn parameter(msg: impl Into<String>) -> Self {
        MotionError::Parameter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, MotionError>;
