use anet::constants::{error_code_table, RECV_BUF_SIZE};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use pyo3::wrap_pymodule;

mod function;
mod value;

/// Registers the `anet` namespace: the socket operations, plus the error
/// codes under `anet.errno`.
#[pymodule]
fn anet(
    py: Python,
    m: &PyModule,
) -> PyResult<()> {
    let sys = PyModule::import(py, "sys")?;
    let sys_modules: &PyDict = sys.getattr("modules")?.downcast()?;

    // Operations
    function::register(m)?;
    m.add("BUFFER_SIZE", RECV_BUF_SIZE)?;

    // `errno` constants
    m.add_wrapped(wrap_pymodule!(errno))?;
    sys_modules.set_item("anet.errno", m.getattr("errno")?)?;

    Ok(())
}

#[pymodule]
fn errno(
    _py: Python,
    m: &PyModule,
) -> PyResult<()> {
    for (name, code) in error_code_table() {
        m.add(name, code)?;
    }

    Ok(())
}
