use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::severity::SeverityCalibration;
use crate::types::PipelineParams;

/// Reads a JSON config file. A missing file yields `T::default()`.
fn load_or_default<T>(path: &Path, what: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        log::warn!("{what} not found at {}, using defaults", path.display());
        return Ok(T::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {what} from {}", path.display()))?;
    let mut de = serde_json::Deserializer::from_str(&contents);
    let value: T = serde_path_to_error::deserialize(&mut de)
        .map_err(|e| anyhow::anyhow!("{} at {}: {}", what, e.path(), e.inner()))
        .with_context(|| format!("parsing {}", path.display()))?;
    log::info!("{what} loaded from {}", path.display());
    Ok(value)
}

fn save_pretty<T: Serialize>(value: &T, path: &Path, what: &str) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).with_context(|| format!("serializing {what}"))?;
    std::fs::write(path, json).with_context(|| format!("writing {what} to {}", path.display()))?;
    log::info!("{what} saved to {}", path.display());
    Ok(())
}

/// Loads pipeline tunables and validates them.
pub fn load_params(path: impl AsRef<Path>) -> anyhow::Result<PipelineParams> {
    let params: PipelineParams = load_or_default(path.as_ref(), "pipeline params")?;
    params.validate()?;
    Ok(params)
}

pub fn save_params(params: &PipelineParams, path: impl AsRef<Path>) -> anyhow::Result<()> {
    save_pretty(params, path.as_ref(), "pipeline params")
}

/// Loads a severity calibration and validates it.
pub fn load_calibration(path: impl AsRef<Path>) -> anyhow::Result<SeverityCalibration> {
    let cal: SeverityCalibration = load_or_default(path.as_ref(), "severity calibration")?;
    cal.validate()?;
    Ok(cal)
}

pub fn save_calibration(calibration: &SeverityCalibration, path: impl AsRef<Path>) -> anyhow::Result<()> {
    save_pretty(calibration, path.as_ref(), "severity calibration")
}
