//! Result marshaling with an explicit failure indicator.
//!
//! Failures put nil (or `false` for status-only calls) in the primary slot,
//! followed by the message and the platform code. A valid zero result is thus
//! never confused with a failure.

use crate::{NativeError, NativeResult, Value};
use bytes::Bytes;
use std::net::IpAddr;
use std::os::unix::io::RawFd;

pub type Values = Vec<Value>;

/// `(nil, message, code)`
pub fn failure(error: NativeError) -> Values {
    vec![Value::Nil, Value::Text(error.message), Value::Integer(error.code.into())]
}

/// `(fd)` or `(nil, message, code)`
pub fn descriptor(result: NativeResult<RawFd>) -> Values {
    match result {
        Ok(fd) => vec![fd.into()],
        Err(error) => failure(error),
    }
}

/// `(count)` or `(nil, message, code)`
pub fn count(result: NativeResult<usize>) -> Values {
    match result {
        Ok(count) => vec![count.into()],
        Err(error) => failure(error),
    }
}

/// `(count, payload)` or `(nil, message, code)`
pub fn payload(result: NativeResult<Bytes>) -> Values {
    match result {
        Ok(payload) => vec![payload.len().into(), payload.into()],
        Err(error) => failure(error),
    }
}

/// `(true)` or `(false, message, code)`
pub fn status(result: NativeResult<()>) -> Values {
    match result {
        Ok(()) => vec![true.into()],
        Err(error) => vec![false.into(), Value::Text(error.message), Value::Integer(error.code.into())],
    }
}

/// Always two values: `(true, address)` or `(false, message)`.
pub fn resolution(result: NativeResult<IpAddr>) -> Values {
    match result {
        Ok(ip) => vec![true.into(), ip.into()],
        Err(error) => vec![false.into(), Value::Text(error.message)],
    }
}
