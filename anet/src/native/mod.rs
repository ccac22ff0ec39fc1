//! Native socket primitives.
//!
//! Every function here performs one OS-level operation (or the short fixed
//! sequence the operation needs, such as socket + connect) and reports
//! failure as a [`NativeError`] carrying the message and `errno`.

use crate::common::util;
use crate::{NativeError, NativeResult, SocketPrimitives};
use bytes::{Bytes, BytesMut};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::unistd;
use std::net::{IpAddr, SocketAddr};
use std::os::unix::io::RawFd;

mod tcp;

pub use tcp::{accept, sock_name, tcp_connect, tcp_keepalive, tcp_nodelay, tcp_nonblock_connect, tcp_server};

/// The OS-backed primitive set.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anet;

///
///
///
pub fn resolve(host: &str) -> NativeResult<IpAddr> {
    util::lookup_ip(host).map_err(|_| NativeError::new(format!("can't resolve: {}", host), 0))
}

/// Reads at most `count` bytes into a buffer owned by the returned payload.
pub fn read(
    fd: RawFd,
    count: usize,
) -> NativeResult<Bytes> {
    let mut buffer = BytesMut::zeroed(count);

    let nread = unistd::read(fd, &mut buffer).map_err(NativeError::errno)?;
    buffer.truncate(nread);

    Ok(buffer.freeze())
}

///
///
///
pub fn write(
    fd: RawFd,
    data: &[u8],
) -> NativeResult<usize> {
    unistd::write(fd, data).map_err(NativeError::errno)
}

///
///
///
pub fn close(fd: RawFd) -> NativeResult<()> {
    unistd::close(fd).map_err(NativeError::errno)
}

/// Sets `O_NONBLOCK` on any descriptor, keeping its other status flags.
pub fn nonblock(fd: RawFd) -> NativeResult<()> {
    let flags = fcntl(fd, FcntlArg::F_GETFL).map_err(|e| NativeError::context("fcntl(F_GETFL)", e))?;
    let flags = OFlag::from_bits_truncate(flags) | OFlag::O_NONBLOCK;

    fcntl(fd, FcntlArg::F_SETFL(flags)).map_err(|e| NativeError::context("fcntl(F_SETFL,O_NONBLOCK)", e))?;

    Ok(())
}

impl SocketPrimitives for Anet {
    fn tcp_connect(
        &self,
        addr: &str,
        port: u16,
    ) -> NativeResult<RawFd> {
        tcp_connect(addr, port)
    }

    fn tcp_nonblock_connect(
        &self,
        addr: &str,
        port: u16,
    ) -> NativeResult<RawFd> {
        tcp_nonblock_connect(addr, port)
    }

    fn tcp_server(
        &self,
        port: u16,
        bindaddr: Option<&str>,
    ) -> NativeResult<RawFd> {
        tcp_server(port, bindaddr)
    }

    fn accept(
        &self,
        fd: RawFd,
    ) -> NativeResult<(RawFd, SocketAddr)> {
        accept(fd)
    }

    fn resolve(
        &self,
        host: &str,
    ) -> NativeResult<IpAddr> {
        resolve(host)
    }

    fn read(
        &self,
        fd: RawFd,
        count: usize,
    ) -> NativeResult<Bytes> {
        read(fd, count)
    }

    fn write(
        &self,
        fd: RawFd,
        data: &[u8],
    ) -> NativeResult<usize> {
        write(fd, data)
    }

    fn close(
        &self,
        fd: RawFd,
    ) -> NativeResult<()> {
        close(fd)
    }

    fn nonblock(
        &self,
        fd: RawFd,
    ) -> NativeResult<()> {
        nonblock(fd)
    }

    fn tcp_nodelay(
        &self,
        fd: RawFd,
    ) -> NativeResult<()> {
        tcp_nodelay(fd)
    }

    fn tcp_keepalive(
        &self,
        fd: RawFd,
    ) -> NativeResult<()> {
        tcp_keepalive(fd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    fn pipe() -> (RawFd, RawFd) {
        unistd::pipe().unwrap()
    }

    #[test]
    fn read_returns_exactly_what_was_written() {
        let (reader, writer) = pipe();

        assert_eq!(write(writer, b"hello").unwrap(), 5);
        let payload = read(reader, 16).unwrap();
        assert_eq!(&payload[..], b"hello");

        close(reader).unwrap();
        close(writer).unwrap();
    }

    #[test]
    fn read_zero_bytes() {
        let (reader, writer) = pipe();

        assert!(read(reader, 0).unwrap().is_empty());

        close(reader).unwrap();
        close(writer).unwrap();
    }

    #[test]
    fn nonblocking_read_would_block() {
        let (reader, writer) = pipe();

        nonblock(reader).unwrap();
        let error = read(reader, 16).unwrap_err();
        assert_eq!(error.kind(), Some(ErrorCode::WouldBlock));

        close(reader).unwrap();
        close(writer).unwrap();
    }

    #[test]
    fn invalid_descriptor() {
        let error = nonblock(-1).unwrap_err();

        assert_eq!(error.kind(), Some(ErrorCode::BadDescriptor));
        assert!(error.message.starts_with("fcntl(F_GETFL): "));
    }

    #[test]
    fn unresolvable_host() {
        let error = resolve("no such host.invalid").unwrap_err();

        assert_eq!(error.message, "can't resolve: no such host.invalid");
        assert_eq!(error.code, 0);
    }
}
