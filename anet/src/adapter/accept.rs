use crate::adapter::Values;
use crate::Value;
use std::net::{IpAddr, SocketAddr};
use std::os::unix::io::RawFd;

/// Which peer details the caller asked `accept` to return.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AcceptOptions {
    pub peer_address: bool,
    pub peer_port: bool,
}

/// Peer details of an accepted connection, limited to what was requested.
#[derive(Clone, Debug, PartialEq)]
pub enum PeerInfo {
    Absent,
    Address(IpAddr),
    Port(u16),
    Full(SocketAddr),
}

impl PeerInfo {
    ///
    ///
    ///
    pub fn select(
        peer: SocketAddr,
        options: AcceptOptions,
    ) -> Self {
        match (options.peer_address, options.peer_port) {
            (false, false) => PeerInfo::Absent,
            (true, false) => PeerInfo::Address(peer.ip()),
            (false, true) => PeerInfo::Port(peer.port()),
            (true, true) => PeerInfo::Full(peer),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Accepted {
    pub fd: RawFd,
    pub peer: PeerInfo,
}

impl Accepted {
    /// `(fd [, address] [, port])`; slots that were not requested are omitted.
    pub fn into_values(self) -> Values {
        let mut values = vec![Value::from(self.fd)];

        match self.peer {
            PeerInfo::Absent => {}
            PeerInfo::Address(ip) => values.push(ip.into()),
            PeerInfo::Port(port) => values.push(port.into()),
            PeerInfo::Full(peer) => {
                values.push(peer.ip().into());
                values.push(peer.port().into());
            }
        }

        values
    }
}
