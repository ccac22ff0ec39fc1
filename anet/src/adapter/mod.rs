//! The call adapter.
//!
//! Each operation extracts its arguments from a [`Frame`], invokes exactly one
//! native primitive and marshals the outcome into [`Values`]. Argument faults
//! abort the call with an [`ArgumentError`]; native failures are returned as
//! values (see [`reply`]). Nothing here keeps state between calls, so an
//! adapter can be shared freely between threads.

use crate::constants::RECV_BUF_SIZE;
use crate::{Anet, ArgumentError, SocketPrimitives};

mod accept;
mod frame;
pub mod reply;
mod value;

pub use accept::{AcceptOptions, Accepted, PeerInfo};
pub use frame::Frame;
pub use reply::Values;
pub use value::Value;

/// Names of the operations published in the `anet` namespace.
pub const OPERATIONS: [&str; 11] = [
    "tcpconnect",
    "tcpnbconnect",
    "read",
    "write",
    "tcpserver",
    "accept",
    "resolve",
    "close",
    "nonblock",
    "tcpnodelay",
    "tcpkeepalive",
];

#[derive(Clone, Debug, Default)]
pub struct Adapter<P = Anet> {
    primitives: P,
}

impl Adapter<Anet> {
    /// An adapter over the OS-backed primitives.
    pub fn native() -> Self {
        Adapter::new(Anet)
    }
}

impl<P: SocketPrimitives> Adapter<P> {
    pub fn new(primitives: P) -> Self {
        Adapter { primitives }
    }

    pub fn primitives(&self) -> &P {
        &self.primitives
    }

    /// Dispatches a named operation.
    pub fn call(
        &self,
        operation: &str,
        args: &[Value],
    ) -> Result<Values, ArgumentError> {
        let frame = Frame::new(operation, args);

        match operation {
            "tcpconnect" => self.tcp_connect(&frame),
            "tcpnbconnect" => self.tcp_nonblock_connect(&frame),
            "read" => self.read(&frame),
            "write" => self.write(&frame),
            "tcpserver" => self.tcp_server(&frame),
            "accept" => self.accept(&frame),
            "resolve" => self.resolve(&frame),
            "close" => self.close(&frame),
            "nonblock" => self.nonblock(&frame),
            "tcpnodelay" => self.tcp_nodelay(&frame),
            "tcpkeepalive" => self.tcp_keepalive(&frame),
            _ => Err(ArgumentError::UnknownOperation(operation.to_string())),
        }
    }

    /// `tcpconnect(addr, port)`
    pub fn tcp_connect(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(2)?;
        let addr = frame.check_str(1)?;
        let port = frame.check_port(2)?;

        Ok(reply::descriptor(self.primitives.tcp_connect(addr, port)))
    }

    /// `tcpnbconnect(addr, port)`
    pub fn tcp_nonblock_connect(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(2)?;
        let addr = frame.check_str(1)?;
        let port = frame.check_port(2)?;

        Ok(reply::descriptor(self.primitives.tcp_nonblock_connect(addr, port)))
    }

    /// `read(fd [, count])`, where `count` defaults to the buffer capacity.
    pub fn read(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(2)?;
        let fd = frame.check_fd(1)?;

        let count = match frame.opt_integer(2)? {
            None => RECV_BUF_SIZE,
            Some(count) if count < 0 => return Err(frame.range(2, "negative byte count")),
            Some(count) if count as u64 > RECV_BUF_SIZE as u64 => {
                return Err(ArgumentError::BufferTooLarge {
                    requested: count,
                    capacity: RECV_BUF_SIZE,
                })
            }
            Some(count) => count as usize,
        };

        Ok(reply::payload(self.primitives.read(fd, count)))
    }

    /// `write(fd, data)`
    pub fn write(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(2)?;
        let fd = frame.check_fd(1)?;
        let data = frame.check_bytes(2)?;

        Ok(reply::count(self.primitives.write(fd, data)))
    }

    /// `tcpserver(port [, bindaddr])`
    pub fn tcp_server(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(2)?;
        let port = frame.check_port(1)?;
        let bindaddr = frame.opt_str(2)?;

        Ok(reply::descriptor(self.primitives.tcp_server(port, bindaddr)))
    }

    /// `accept(fd [, want_address [, want_port]])`
    pub fn accept(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(3)?;
        let fd = frame.check_fd(1)?;
        let options = AcceptOptions {
            peer_address: frame.flag(2),
            peer_port: frame.flag(3),
        };

        let values = match self.primitives.accept(fd) {
            Ok((fd, peer)) => Accepted {
                fd,
                peer: PeerInfo::select(peer, options),
            }
            .into_values(),
            Err(error) => reply::failure(error),
        };

        Ok(values)
    }

    /// `resolve(host)`
    pub fn resolve(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(1)?;
        let host = frame.check_str(1)?;

        Ok(reply::resolution(self.primitives.resolve(host)))
    }

    /// `close(fd)`
    pub fn close(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(1)?;
        let fd = frame.check_fd(1)?;

        Ok(reply::status(self.primitives.close(fd)))
    }

    /// `nonblock(fd)`
    pub fn nonblock(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(1)?;
        let fd = frame.check_fd(1)?;

        Ok(reply::status(self.primitives.nonblock(fd)))
    }

    /// `tcpnodelay(fd)`
    pub fn tcp_nodelay(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(1)?;
        let fd = frame.check_fd(1)?;

        Ok(reply::status(self.primitives.tcp_nodelay(fd)))
    }

    /// `tcpkeepalive(fd)`
    pub fn tcp_keepalive(
        &self,
        frame: &Frame,
    ) -> Result<Values, ArgumentError> {
        frame.check_arity(1)?;
        let fd = frame.check_fd(1)?;

        Ok(reply::status(self.primitives.tcp_keepalive(fd)))
    }
}
