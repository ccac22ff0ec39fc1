use crate::value;
use anet::{Adapter, ArgumentError};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyTuple;
use pyo3::wrap_pyfunction;

/// Declares one Python function per adapter operation, all sharing `call`.
macro_rules! operations {
    ($($name:ident),* $(,)?) => {
        $(
            #[pyfunction(args = "*")]
            fn $name(
                py: Python,
                args: &PyTuple,
            ) -> PyResult<PyObject> {
                call(py, stringify!($name), args)
            }
        )*

        pub fn register(m: &PyModule) -> PyResult<()> {
            $(
                m.add_function(wrap_pyfunction!($name, m)?)?;
            )*

            Ok(())
        }
    };
}

operations!(
    tcpconnect,
    tcpnbconnect,
    read,
    write,
    tcpserver,
    accept,
    resolve,
    close,
    nonblock,
    tcpnodelay,
    tcpkeepalive,
);

/// Marshals the arguments, runs the operation without holding the GIL, and
/// marshals the results back. Argument faults are raised; native failures are
/// part of the returned tuple.
fn call(
    py: Python,
    operation: &str,
    args: &PyTuple,
) -> PyResult<PyObject> {
    let args = args.iter().map(value::from_py).collect::<PyResult<Vec<_>>>()?;

    let values = py
        .allow_threads(|| Adapter::native().call(operation, &args))
        .map_err(raise)?;

    Ok(value::into_tuple(py, values))
}

fn raise(error: ArgumentError) -> PyErr {
    match error {
        ArgumentError::Range { .. } | ArgumentError::BufferTooLarge { .. } => PyValueError::new_err(error.to_string()),
        _ => PyTypeError::new_err(error.to_string()),
    }
}
