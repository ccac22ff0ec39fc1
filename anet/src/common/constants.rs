/// Capacity of a single `read`; larger requests are a caller fault.
pub const RECV_BUF_SIZE: usize = 65536;

/// Bound on native error messages, terminator included.
pub const ERR_LEN: usize = 256;

pub const LISTEN_BACKLOG: i32 = 511;

/// Error codes published to callers for comparison against returned codes.
#[repr(i32)]
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, Hash, PartialEq)]
pub enum ErrorCode {
    InProgress = libc::EINPROGRESS,
    WouldBlock = libc::EAGAIN,
    Io = libc::EIO,
    BadDescriptor = libc::EBADF,
    Interrupted = libc::EINTR,
    NotSocket = libc::ENOTSOCK,
}

pub const ERROR_CODES: [ErrorCode; 6] = [
    ErrorCode::InProgress,
    ErrorCode::WouldBlock,
    ErrorCode::Io,
    ErrorCode::BadDescriptor,
    ErrorCode::Interrupted,
    ErrorCode::NotSocket,
];

impl ErrorCode {
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::InProgress => "EINPROGRESS",
            ErrorCode::WouldBlock => "EAGAIN",
            ErrorCode::Io => "EIO",
            ErrorCode::BadDescriptor => "EBADF",
            ErrorCode::Interrupted => "EINTR",
            ErrorCode::NotSocket => "ENOTSOCK",
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// The `errno` table as `(name, value)` pairs, in publication order.
pub fn error_code_table() -> impl Iterator<Item = (&'static str, i32)> {
    ERROR_CODES.iter().map(|code| (code.name(), code.code()))
}
