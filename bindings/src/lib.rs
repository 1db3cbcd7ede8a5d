//! Forzium model-state FFI bindings.
//!
//! Example:
//!     from _rust_lib.model_state import ModelStateDictionary
//!     state = ModelStateDictionary(max_allowed_errors=50)
//!     state.add_error("Address.City", "The City field is required.")
//!     state.field_validation_state("Address")  # "Invalid"

use pyo3::prelude::*;

mod model_state;

#[pymodule]
fn _rust_lib(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // A host application may already own the logger.
    let _ = env_logger::try_init();

    model_state::register_module(m)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
