use crate::constants::ERR_LEN;
use crate::ErrorCode;
use nix::errno::Errno;
use num_traits::FromPrimitive;
use std::fmt::Display;
use std::io;
use thiserror::Error;

pub type NativeResult<T> = Result<T, NativeError>;

/// Failure reported by a native socket primitive.
///
/// Carries the human-readable message and the platform error code (`errno`).
/// A code of `0` means the failure did not originate from the OS, e.g. a host
/// name that could not be resolved.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message}")]
pub struct NativeError {
    pub message: String,
    pub code: i32,
}

impl NativeError {
    ///
    ///
    ///
    pub fn new<S: Into<String>>(
        message: S,
        code: i32,
    ) -> Self {
        let mut message = message.into();

        // Same bound as the native error buffer, minus the terminator.
        if message.len() >= ERR_LEN {
            let mut end = ERR_LEN - 1;
            while !message.is_char_boundary(end) {
                end -= 1;
            }
            message.truncate(end);
        }

        NativeError { message, code }
    }

    /// Plain `strerror` text for the given errno.
    pub fn errno(errno: Errno) -> Self {
        NativeError::new(errno.desc(), errno as i32)
    }

    /// Formats as `<context>: <strerror>`, the way the native library does.
    pub fn context<C: Display>(
        context: C,
        errno: Errno,
    ) -> Self {
        NativeError::new(format!("{}: {}", context, errno.desc()), errno as i32)
    }

    ///
    ///
    ///
    pub fn os<C: Display>(
        context: C,
        error: io::Error,
    ) -> Self {
        match error.raw_os_error() {
            Some(code) => NativeError::context(context, Errno::from_i32(code)),
            None => NativeError::new(format!("{}: {}", context, error), 0),
        }
    }

    /// The symbolic error code, if it is one of the published constants.
    pub fn kind(&self) -> Option<ErrorCode> {
        ErrorCode::from_i32(self.code)
    }
}

/// Contract violation by the caller of an adapter operation.
///
/// These are fatal to the current call and never returned as values.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ArgumentError {
    #[error("bad argument #{position} to '{operation}' ({expected} expected, got {got})")]
    Type {
        operation: String,
        position: usize,
        expected: &'static str,
        got: &'static str,
    },
    #[error("bad argument #{position} to '{operation}' ({reason})")]
    Range {
        operation: String,
        position: usize,
        reason: String,
    },
    #[error("Maximum buffer size is {capacity}")]
    BufferTooLarge { requested: i64, capacity: usize },
    #[error("'{operation}' takes at most {max} arguments, got {got}")]
    TooMany {
        operation: String,
        max: usize,
        got: usize,
    },
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
}
