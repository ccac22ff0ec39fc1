use crate::NativeResult;
use bytes::Bytes;
use std::net::{IpAddr, SocketAddr};
use std::os::unix::io::RawFd;

/// The native socket primitive set wrapped by the adapter.
///
/// Each method is exactly one native call; implementations report failure
/// with the message and platform code of the underlying error.
pub trait SocketPrimitives {
    fn tcp_connect(
        &self,
        addr: &str,
        port: u16,
    ) -> NativeResult<RawFd>;

    fn tcp_nonblock_connect(
        &self,
        addr: &str,
        port: u16,
    ) -> NativeResult<RawFd>;

    fn tcp_server(
        &self,
        port: u16,
        bindaddr: Option<&str>,
    ) -> NativeResult<RawFd>;

    fn accept(
        &self,
        fd: RawFd,
    ) -> NativeResult<(RawFd, SocketAddr)>;

    fn resolve(
        &self,
        host: &str,
    ) -> NativeResult<IpAddr>;

    fn read(
        &self,
        fd: RawFd,
        count: usize,
    ) -> NativeResult<Bytes>;

    fn write(
        &self,
        fd: RawFd,
        data: &[u8],
    ) -> NativeResult<usize>;

    fn close(
        &self,
        fd: RawFd,
    ) -> NativeResult<()>;

    fn nonblock(
        &self,
        fd: RawFd,
    ) -> NativeResult<()>;

    fn tcp_nodelay(
        &self,
        fd: RawFd,
    ) -> NativeResult<()>;

    fn tcp_keepalive(
        &self,
        fd: RawFd,
    ) -> NativeResult<()>;
}
