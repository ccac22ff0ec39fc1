use anet::{Value, Values};
use bytes::Bytes;
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyBytes, PyFloat, PyLong, PyString, PyTuple};

///
///
///
pub fn from_py(object: &PyAny) -> PyResult<Value> {
    if object.is_none() {
        return Ok(Value::Nil);
    }

    // `bool` is a subclass of `int`, so it goes first.
    if let Ok(boolean) = object.downcast::<PyBool>() {
        Ok(Value::Boolean(boolean.is_true()))
    } else if object.is_instance::<PyLong>()? {
        Ok(Value::Integer(object.extract()?))
    } else if let Ok(number) = object.downcast::<PyFloat>() {
        Ok(Value::Number(number.value()))
    } else if let Ok(text) = object.downcast::<PyString>() {
        Ok(Value::Text(text.to_str()?.to_string()))
    } else if let Ok(bytes) = object.downcast::<PyBytes>() {
        Ok(Value::Bytes(Bytes::copy_from_slice(bytes.as_bytes())))
    } else {
        Err(PyTypeError::new_err("expected None, bool, int, float, str or bytes"))
    }
}

///
///
///
pub fn into_py(
    py: Python,
    value: Value,
) -> PyObject {
    match value {
        Value::Nil => py.None(),
        Value::Boolean(boolean) => boolean.into_py(py),
        Value::Integer(integer) => integer.into_py(py),
        Value::Number(number) => number.into_py(py),
        Value::Text(text) => text.into_py(py),
        Value::Bytes(bytes) => PyBytes::new(py, &bytes).into_py(py),
    }
}

/// Results are always a tuple, so callers check arity with `len()`.
pub fn into_tuple(
    py: Python,
    values: Values,
) -> PyObject {
    let objects: Vec<PyObject> = values.into_iter().map(|v| into_py(py, v)).collect();

    PyTuple::new(py, objects).into_py(py)
}
