use crate::common::util;
use crate::constants::LISTEN_BACKLOG;
use crate::{NativeError, NativeResult};
use nix::errno::Errno;
use nix::sys::socket::{self, sockopt, SockaddrStorage};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::os::unix::io::{IntoRawFd, RawFd};

/// Connects to `addr:port` and blocks until the connection is established.
pub fn tcp_connect(
    addr: &str,
    port: u16,
) -> NativeResult<RawFd> {
    connect(addr, port, false)
}

/// Starts connecting to `addr:port` on a non-blocking socket.
///
/// A connection still in progress is a success; its outcome is learned by
/// the caller when the descriptor becomes writable.
pub fn tcp_nonblock_connect(
    addr: &str,
    port: u16,
) -> NativeResult<RawFd> {
    connect(addr, port, true)
}

///
///
///
pub fn tcp_server(
    port: u16,
    bindaddr: Option<&str>,
) -> NativeResult<RawFd> {
    let ip = match bindaddr {
        Some(bindaddr) => bindaddr
            .parse::<IpAddr>()
            .map_err(|_| NativeError::new("invalid bind address", libc::EINVAL))?,
        None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    };

    let local = SocketAddr::new(ip, port);
    let socket = create_socket(&local)?;

    socket
        .bind(&SockAddr::from(local))
        .map_err(|e| NativeError::os("bind", e))?;
    socket
        .listen(LISTEN_BACKLOG)
        .map_err(|e| NativeError::os("listen", e))?;

    let fd = socket.into_raw_fd();
    debug!("Listening on {} (fd {}).", local, fd);

    Ok(fd)
}

/// Accepts one pending connection, returning its descriptor and peer.
///
/// Interrupted calls are retried. A peer that is not an internet address is
/// reported as `0.0.0.0:0`.
pub fn accept(fd: RawFd) -> NativeResult<(RawFd, SocketAddr)> {
    let accepted = loop {
        match socket::accept(fd) {
            Ok(accepted) => break accepted,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(NativeError::context("accept", e)),
        }
    };

    let peer = socket::getpeername::<SockaddrStorage>(accepted)
        .ok()
        .and_then(|peer| inet(&peer))
        .unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0));

    debug!("Accepted connection from {} (fd {}).", peer, accepted);

    Ok((accepted, peer))
}

///
///
///
pub fn tcp_nodelay(fd: RawFd) -> NativeResult<()> {
    socket::setsockopt(fd, sockopt::TcpNoDelay, &true)
        .map_err(|e| NativeError::context("setsockopt TCP_NODELAY", e))
}

///
///
///
pub fn tcp_keepalive(fd: RawFd) -> NativeResult<()> {
    socket::setsockopt(fd, sockopt::KeepAlive, &true)
        .map_err(|e| NativeError::context("setsockopt SO_KEEPALIVE", e))
}

/// Local address a socket is bound to.
pub fn sock_name(fd: RawFd) -> NativeResult<SocketAddr> {
    let local = socket::getsockname::<SockaddrStorage>(fd).map_err(|e| NativeError::context("getsockname", e))?;

    inet(&local).ok_or_else(|| NativeError::new("getsockname: not an internet socket", libc::EAFNOSUPPORT))
}

/// Converts an IPv4 or IPv6 socket address; other families give `None`.
fn inet(addr: &SockaddrStorage) -> Option<SocketAddr> {
    addr.as_sockaddr_in()
        .map(|v4| SocketAddr::V4((*v4).into()))
        .or_else(|| addr.as_sockaddr_in6().map(|v6| SocketAddr::V6((*v6).into())))
}

fn connect(
    addr: &str,
    port: u16,
    nonblock: bool,
) -> NativeResult<RawFd> {
    let ip = util::lookup_ip(addr).map_err(|_| NativeError::new(format!("can't resolve: {}", addr), 0))?;
    let remote = SocketAddr::new(ip, port);

    let socket = create_socket(&remote)?;
    if nonblock {
        socket
            .set_nonblocking(true)
            .map_err(|e| NativeError::os("fcntl(F_SETFL,O_NONBLOCK)", e))?;
    }

    match socket.connect(&SockAddr::from(remote)) {
        Ok(()) => {}
        Err(e) if nonblock && e.raw_os_error() == Some(libc::EINPROGRESS) => {}
        Err(e) => return Err(NativeError::os("connect", e)),
    }

    let fd = socket.into_raw_fd();
    debug!("Connected to {} (fd {}, nonblock: {}).", remote, fd, nonblock);

    Ok(fd)
}

fn create_socket(addr: &SocketAddr) -> NativeResult<Socket> {
    let socket = Socket::new(Domain::for_address(*addr), Type::STREAM, Some(Protocol::TCP))
        .map_err(|e| NativeError::os("creating socket", e))?;

    socket
        .set_reuse_address(true)
        .map_err(|e| NativeError::os("setsockopt SO_REUSEADDR", e))?;

    Ok(socket)
}
