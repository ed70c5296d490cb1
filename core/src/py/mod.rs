use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::api;

// ──────────────────────────────────────────────────────────────────────────────
// Python surface: JSON strings in, JSON strings out
// ──────────────────────────────────────────────────────────────────────────────

#[pyfunction]
fn analyze_recording_json(json_in: &str) -> PyResult<String> {
    api::analyze_recording_json(json_in).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
fn classify_json(json_in: &str) -> PyResult<String> {
    api::classify_json(json_in).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Accepts a dict as well as a JSON string; dicts go through `json.dumps`.
#[pyfunction]
fn analyze_recording(py: Python<'_>, payload: &PyAny) -> PyResult<PyObject> {
    let json_mod = py
        .import("json")
        .map_err(|e| PyValueError::new_err(format!("failed to import json: {e}")))?;

    let json_in: String = if let Ok(s) = payload.extract::<&str>() {
        s.to_owned()
    } else {
        json_mod
            .call_method1("dumps", (payload,))
            .and_then(|o| o.extract::<String>())
            .map_err(|e| PyValueError::new_err(format!("failed to serialize payload with json.dumps: {e}")))?
    };

    let out = api::analyze_recording_json(&json_in).map_err(|e| PyValueError::new_err(e.to_string()))?;

    let obj = json_mod
        .call_method1("loads", (out.as_str(),))
        .map_err(|e| PyValueError::new_err(format!("internal JSON parse error via json.loads: {e}")))?;
    Ok(obj.into_py(py))
}

#[pymodule]
fn motiongrade_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_recording, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_recording_json, m)?)?;
    m.add_function(wrap_pyfunction!(classify_json, m)?)?;
    Ok(())
}
