use forzium_modelstate::api::{
    is_prefix_match, serializable_error, ConversionError, ErrorPayload, ModelStateDictionary,
    ModelStateError, ModelStateOptions, ValueProviderResult,
};
use pyo3::exceptions::{
    PyBaseException, PyOverflowError, PyRuntimeError, PyTypeError, PyValueError,
};
use pyo3::prelude::*;
use serde_json::Value as JsonValue;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

// Object counter for tracking
static STATE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Catch panics for model state operations
fn catch_panic_state<F, R>(f: F) -> PyResult<R>
where
    F: FnOnce() -> PyResult<R>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(_) => Err(PyRuntimeError::new_err(
            "Rust panic occurred in model_state module",
        )),
    }
}

fn to_py_err(err: ModelStateError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// **PYTHON MODEL STATE DICTIONARY**
///
/// **PURPOSE**: Per-request binding and validation bookkeeping for Python handlers
/// **GUARANTEE**: One owner per instance; `branch()` gives cheap nested scopes
#[pyclass(name = "ModelStateDictionary")]
pub struct PyModelStateDictionary {
    inner: ModelStateDictionary,
    #[pyo3(get)]
    id: u64, // Unique ID for lifetime tracking
}

impl PyModelStateDictionary {
    fn wrap(inner: ModelStateDictionary) -> Self {
        let id = STATE_COUNTER.fetch_add(1, Ordering::SeqCst);

        #[cfg(debug_assertions)]
        log::debug!("Creating PyModelStateDictionary {}", id);

        Self { inner, id }
    }
}

#[pymethods]
impl PyModelStateDictionary {
    /// **CONSTRUCTOR**
    #[new]
    #[pyo3(signature = (max_allowed_errors=200))]
    fn new(max_allowed_errors: i64) -> PyResult<Self> {
        let max_allowed_errors =
            ModelStateOptions::checked_max_allowed_errors(max_allowed_errors).map_err(to_py_err)?;
        Ok(Self::wrap(ModelStateDictionary::with_options(
            ModelStateOptions::with_max_allowed_errors(max_allowed_errors),
        )))
    }

    /// **ADD ERROR**
    ///
    /// **PARAMETERS**:
    /// - `key: &str` - Model key, `""` for the whole model
    /// - `error` - Message string or exception instance; `ValueError` and
    ///   `OverflowError` count as conversion failures
    ///
    /// **RETURNS**: `False` once the error ceiling has been reached
    fn add_error(&mut self, key: &str, error: &Bound<'_, PyAny>) -> PyResult<bool> {
        let payload = error_payload(error)?;
        catch_panic_state(|| Ok(self.inner.add_error(key, payload)))
    }

    /// **SET BOUND VALUE**
    #[pyo3(signature = (key, raw_value, attempted_value=None))]
    fn set_value(
        &mut self,
        py: Python<'_>,
        key: &str,
        raw_value: &Bound<'_, PyAny>,
        attempted_value: Option<String>,
    ) -> PyResult<()> {
        let raw_value = py_to_json(py, raw_value)?;
        match attempted_value {
            Some(text) => self.inner.set_model_value(key, raw_value, Some(text)),
            None => self.inner.set_value(key, ValueProviderResult::new(raw_value)),
        }
        Ok(())
    }

    /// **RAW VALUE** - `None` when the key is absent or has no value
    fn raw_value(&self, py: Python<'_>, key: &str) -> PyResult<Py<PyAny>> {
        match self.inner.get(key) {
            Some(entry) => json_to_py(py, &entry.raw_value),
            None => Ok(py.None()),
        }
    }

    fn attempted_value(&self, key: &str) -> Option<String> {
        self.inner
            .get(key)
            .and_then(|entry| entry.attempted_value.clone())
    }

    fn mark_valid(&mut self, key: &str) -> PyResult<()> {
        self.inner.mark_field_valid(key).map_err(to_py_err)
    }

    fn mark_skipped(&mut self, key: &str) -> PyResult<()> {
        self.inner.mark_field_skipped(key).map_err(to_py_err)
    }

    fn validation_state(&self, key: &str) -> &'static str {
        self.inner.get_validation_state(key).as_str()
    }

    fn field_validation_state(&self, key: &str) -> &'static str {
        self.inner.get_field_validation_state(key).as_str()
    }

    #[pyo3(signature = (key=""))]
    fn clear_validation_state(&mut self, key: &str) {
        self.inner.clear_validation_state(key);
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.inner
            .find_keys_with_prefix(prefix)
            .map(|(key, _)| key.to_string())
            .collect()
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys().map(str::to_string).collect()
    }

    /// **ERROR MESSAGES** - Empty list when the key is absent
    fn errors(&self, key: &str) -> Vec<String> {
        self.inner
            .get(key)
            .map(|entry| entry.error_messages())
            .unwrap_or_default()
    }

    fn merge(&mut self, other: PyRef<'_, PyModelStateDictionary>) {
        self.inner.merge(&other.inner);
    }

    /// **BRANCH** - Copy-on-write child scope
    fn branch(&self) -> Self {
        Self::wrap(ModelStateDictionary::from_parent(&self.inner))
    }

    fn remove(&mut self, key: &str) -> bool {
        self.inner.remove(key).is_some()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    /// **ERROR VIEW** - `{key: [messages]}` for every key with errors
    fn to_error_dict(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        json_to_py(py, &serializable_error(&self.inner))
    }

    #[getter]
    fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    #[getter]
    fn error_count(&self) -> usize {
        self.inner.error_count()
    }

    #[getter]
    fn has_reached_max_errors(&self) -> bool {
        self.inner.has_reached_max_errors()
    }

    #[getter]
    fn get_max_allowed_errors(&self) -> usize {
        self.inner.max_allowed_errors()
    }

    #[setter]
    fn set_max_allowed_errors(&mut self, value: i64) -> PyResult<()> {
        let value = ModelStateOptions::checked_max_allowed_errors(value).map_err(to_py_err)?;
        self.inner.set_max_allowed_errors(value);
        Ok(())
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __contains__(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    fn __repr__(&self) -> String {
        format!(
            "ModelStateDictionary(entries={}, errors={}, state={})",
            self.inner.len(),
            self.inner.error_count(),
            self.inner.validation_state()
        )
    }
}

impl Drop for PyModelStateDictionary {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        log::debug!("Dropping PyModelStateDictionary {}", self.id);
    }
}

/// **HELPER FUNCTIONS**

/// **CLASSIFY PYTHON ERROR PAYLOAD**
fn error_payload(error: &Bound<'_, PyAny>) -> PyResult<ErrorPayload> {
    if error.is_none() {
        return Err(PyTypeError::new_err("error must not be None"));
    }

    if let Ok(message) = error.extract::<String>() {
        return Ok(ErrorPayload::Message(message));
    }

    if error.is_instance_of::<PyValueError>() || error.is_instance_of::<PyOverflowError>() {
        let reason = error.str()?.to_string();
        return Ok(ErrorPayload::Conversion(ConversionError::new("value", reason)));
    }

    if error.is_instance_of::<PyBaseException>() {
        return Ok(ErrorPayload::raised(PyErr::from_value(error.clone())));
    }

    Err(PyTypeError::new_err(
        "error must be a str or an exception instance",
    ))
}

/// **CONVERT PYTHON OBJECT TO JSON VALUE**
fn py_to_json(py: Python<'_>, value: &Bound<'_, PyAny>) -> PyResult<JsonValue> {
    let dumped = py.import("json")?.call_method1("dumps", (value,))?;
    let json_string: String = dumped.extract()?;

    serde_json::from_str(&json_string)
        .map_err(|e| PyValueError::new_err(format!("Invalid JSON: {}", e)))
}

/// **CONVERT JSON VALUE TO PYTHON OBJECT**
fn json_to_py(py: Python<'_>, value: &JsonValue) -> PyResult<Py<PyAny>> {
    let json_string = serde_json::to_string(value)
        .map_err(|e| PyValueError::new_err(format!("Invalid JSON: {}", e)))?;
    let loaded = py.import("json")?.call_method1("loads", (json_string,))?;
    Ok(loaded.unbind())
}

/// **STRUCTURAL PREFIX MATCH**
#[pyfunction(name = "is_prefix_match")]
#[pyo3(signature = (prefix, candidate, /))]
fn is_prefix_match_py(prefix: &str, candidate: &str) -> bool {
    is_prefix_match(prefix, candidate)
}

/// **REGISTER MODULE WITH PARENT**
pub fn register_module(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "model_state")?;

    m.add_class::<PyModelStateDictionary>()?;
    m.add_function(wrap_pyfunction!(is_prefix_match_py, &m)?)?;

    parent.add_submodule(&m)?;
    Ok(())
}
