use crate::{ArgumentError, Value};
use std::os::unix::io::RawFd;

/// The caller-supplied arguments of one invocation.
///
/// Positions are 1-based, as reported in argument errors. A position past the
/// end of the frame reads as "no value", which optional arguments treat like
/// nil.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    operation: &'a str,
    args: &'a [Value],
}

impl<'a> Frame<'a> {
    pub fn new(
        operation: &'a str,
        args: &'a [Value],
    ) -> Self {
        Frame { operation, args }
    }

    pub fn arg(
        &self,
        position: usize,
    ) -> Option<&'a Value> {
        position.checked_sub(1).and_then(|index| self.args.get(index))
    }

    ///
    ///
    ///
    pub fn check_arity(
        &self,
        max: usize,
    ) -> Result<(), ArgumentError> {
        if self.args.len() > max {
            return Err(ArgumentError::TooMany {
                operation: self.operation.to_string(),
                max,
                got: self.args.len(),
            });
        }

        Ok(())
    }

    ///
    ///
    ///
    pub fn check_integer(
        &self,
        position: usize,
    ) -> Result<i64, ArgumentError> {
        let value = self.required(position, "number")?;

        match value {
            Value::Integer(_) | Value::Number(_) => value
                .as_integer()
                .ok_or_else(|| self.range(position, "number has no integer representation")),
            _ => Err(self.type_error(position, "number")),
        }
    }

    pub fn opt_integer(
        &self,
        position: usize,
    ) -> Result<Option<i64>, ArgumentError> {
        if self.is_absent(position) {
            Ok(None)
        } else {
            self.check_integer(position).map(Some)
        }
    }

    /// A descriptor: an integer in the non-negative `RawFd` range.
    pub fn check_fd(
        &self,
        position: usize,
    ) -> Result<RawFd, ArgumentError> {
        let fd = self.check_integer(position)?;

        if fd < 0 || fd > RawFd::MAX as i64 {
            return Err(self.range(position, "invalid file descriptor"));
        }

        Ok(fd as RawFd)
    }

    ///
    ///
    ///
    pub fn check_port(
        &self,
        position: usize,
    ) -> Result<u16, ArgumentError> {
        let port = self.check_integer(position)?;

        if port < 0 || port > u16::MAX as i64 {
            return Err(self.range(position, "port out of range"));
        }

        Ok(port as u16)
    }

    ///
    ///
    ///
    pub fn check_str(
        &self,
        position: usize,
    ) -> Result<&'a str, ArgumentError> {
        let value = self.required(position, "string")?;

        match value {
            Value::Text(_) | Value::Bytes(_) => value
                .as_str()
                .ok_or_else(|| self.range(position, "string is not valid UTF-8")),
            _ => Err(self.type_error(position, "string")),
        }
    }

    pub fn opt_str(
        &self,
        position: usize,
    ) -> Result<Option<&'a str>, ArgumentError> {
        if self.is_absent(position) {
            Ok(None)
        } else {
            self.check_str(position).map(Some)
        }
    }

    ///
    ///
    ///
    pub fn check_bytes(
        &self,
        position: usize,
    ) -> Result<&'a [u8], ArgumentError> {
        self.required(position, "string")?
            .as_bytes()
            .ok_or_else(|| self.type_error(position, "string"))
    }

    /// Truthiness of an optional flag; absent counts as false.
    pub fn flag(
        &self,
        position: usize,
    ) -> bool {
        self.arg(position).map(Value::is_truthy).unwrap_or(false)
    }

    fn is_absent(
        &self,
        position: usize,
    ) -> bool {
        self.arg(position).map(Value::is_nil).unwrap_or(true)
    }

    fn required(
        &self,
        position: usize,
        expected: &'static str,
    ) -> Result<&'a Value, ArgumentError> {
        self.arg(position).ok_or_else(|| ArgumentError::Type {
            operation: self.operation.to_string(),
            position,
            expected,
            got: "no value",
        })
    }

    fn type_error(
        &self,
        position: usize,
        expected: &'static str,
    ) -> ArgumentError {
        ArgumentError::Type {
            operation: self.operation.to_string(),
            position,
            expected,
            got: self.arg(position).map(Value::type_name).unwrap_or("no value"),
        }
    }

    pub(crate) fn range<S: Into<String>>(
        &self,
        position: usize,
        reason: S,
    ) -> ArgumentError {
        ArgumentError::Range {
            operation: self.operation.to_string(),
            position,
            reason: reason.into(),
        }
    }
}
