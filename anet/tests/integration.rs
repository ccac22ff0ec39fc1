//! End-to-end tests of the adapter over loopback sockets.

use anet::constants::RECV_BUF_SIZE;
use anet::{native, Adapter, ArgumentError, ErrorCode, Value, Values};
use std::net::IpAddr;
use std::os::unix::io::RawFd;
use std::thread;

fn fd_of(values: &Values) -> RawFd {
    match values[..] {
        [Value::Integer(fd), ..] => fd as RawFd,
        _ => panic!("expected a descriptor, got {:?}", values),
    }
}

/// A listening socket on an ephemeral loopback port.
fn listen(adapter: &Adapter) -> (RawFd, u16) {
    let server = fd_of(&adapter.call("tcpserver", &[0.into(), "127.0.0.1".into()]).unwrap());
    let port = native::sock_name(server).unwrap().port();

    (server, port)
}

/// A connected (client, accepted) pair.
fn connected_pair(adapter: &Adapter) -> (RawFd, RawFd, RawFd) {
    let (server, port) = listen(adapter);

    let client = fd_of(&adapter.call("tcpconnect", &["127.0.0.1".into(), port.into()]).unwrap());
    let accepted = fd_of(&adapter.call("accept", &[server.into()]).unwrap());

    (server, client, accepted)
}

fn close_all(
    adapter: &Adapter,
    fds: &[RawFd],
) {
    for fd in fds {
        assert_eq!(adapter.call("close", &[(*fd).into()]).unwrap(), vec![Value::Boolean(true)]);
    }
}

/// Reads until `expected` bytes have arrived.
fn read_exact(
    adapter: &Adapter,
    fd: RawFd,
    expected: usize,
) -> Vec<u8> {
    let mut received = Vec::with_capacity(expected);

    while received.len() < expected {
        let values = adapter.call("read", &[fd.into(), (expected - received.len()).into()]).unwrap();
        match &values[..] {
            [Value::Integer(count), Value::Bytes(payload)] => {
                assert_eq!(*count as usize, payload.len());
                assert_ne!(*count, 0, "unexpected end of stream");
                received.extend_from_slice(payload);
            }
            _ => panic!("read failed: {:?}", values),
        }
    }

    received
}

#[test]
fn resolve_localhost() {
    let adapter = Adapter::native();

    let values = adapter.call("resolve", &["localhost".into()]).unwrap();

    assert_eq!(values.len(), 2);
    assert_eq!(values[0], Value::Boolean(true));
    let address: IpAddr = values[1].to_string().parse().unwrap();
    assert!(address.is_loopback());
}

#[test]
fn resolve_unknown_host() {
    let adapter = Adapter::native();

    let values = adapter.call("resolve", &["no such host.invalid".into()]).unwrap();

    assert_eq!(values.len(), 2);
    assert_eq!(values[0], Value::Boolean(false));
    assert!(!values[1].to_string().is_empty());
}

#[test]
fn round_trip_payload_sizes() {
    let adapter = Adapter::native();
    let (server, client, accepted) = connected_pair(&adapter);

    for size in [0usize, 1, 1024, RECV_BUF_SIZE].iter() {
        let payload: Vec<u8> = (0..*size).map(|i| (i % 251) as u8).collect();

        let writer = {
            let payload = payload.clone();
            thread::spawn(move || {
                let adapter = Adapter::native();
                let mut written = 0;

                loop {
                    let values = adapter.call("write", &[client.into(), payload[written..].to_vec().into()]).unwrap();
                    match values[..] {
                        [Value::Integer(count)] => written += count as usize,
                        _ => panic!("write failed: {:?}", values),
                    }
                    if written == payload.len() {
                        return written;
                    }
                }
            })
        };

        assert_eq!(read_exact(&adapter, accepted, payload.len()), payload);
        assert_eq!(writer.join().unwrap(), *size);
    }

    close_all(&adapter, &[accepted, client, server]);
}

#[test]
fn end_of_stream_reads_zero() {
    let adapter = Adapter::native();
    let (server, client, accepted) = connected_pair(&adapter);

    close_all(&adapter, &[client]);
    let values = adapter.call("read", &[accepted.into(), 16.into()]).unwrap();

    assert_eq!(values, vec![Value::Integer(0), Value::from(Vec::<u8>::new())]);

    close_all(&adapter, &[accepted, server]);
}

#[test]
fn accept_with_peer_info() {
    let adapter = Adapter::native();
    let (server, port) = listen(&adapter);

    let client = fd_of(&adapter.call("tcpconnect", &["127.0.0.1".into(), port.into()]).unwrap());
    let values = adapter.call("accept", &[server.into(), true.into(), true.into()]).unwrap();

    assert_eq!(values.len(), 3);
    assert_eq!(values[1], Value::from("127.0.0.1"));
    let client_port = native::sock_name(client).unwrap().port();
    assert_eq!(values[2], Value::from(client_port));

    close_all(&adapter, &[fd_of(&values), client, server]);
}

#[test]
fn accept_without_peer_info() {
    let adapter = Adapter::native();
    let (server, port) = listen(&adapter);

    let client = fd_of(&adapter.call("tcpconnect", &["localhost".into(), port.into()]).unwrap());
    let values = adapter.call("accept", &[server.into(), false.into()]).unwrap();

    assert_eq!(values.len(), 1);

    close_all(&adapter, &[fd_of(&values), client, server]);
}

#[test]
fn socket_options() {
    let adapter = Adapter::native();
    let (server, client, accepted) = connected_pair(&adapter);

    for operation in ["nonblock", "tcpnodelay", "tcpkeepalive"].iter() {
        assert_eq!(adapter.call(operation, &[client.into()]).unwrap(), vec![Value::Boolean(true)]);
    }

    // Nothing was sent, so a non-blocking read has to give up.
    let values = adapter.call("read", &[client.into()]).unwrap();
    assert_eq!(values[0], Value::Nil);
    assert_eq!(values[2], Value::Integer(ErrorCode::WouldBlock.code().into()));

    close_all(&adapter, &[accepted, client, server]);
}

#[test]
fn nonblocking_connect() {
    let adapter = Adapter::native();
    let (server, port) = listen(&adapter);

    let client = fd_of(&adapter.call("tcpnbconnect", &["127.0.0.1".into(), port.into()]).unwrap());

    close_all(&adapter, &[client, server]);
}

#[test]
fn connect_refused() {
    let adapter = Adapter::native();

    // Grab a free port, then stop listening on it.
    let (server, port) = listen(&adapter);
    close_all(&adapter, &[server]);

    let values = adapter.call("tcpconnect", &["127.0.0.1".into(), port.into()]).unwrap();

    assert_eq!(values.len(), 3);
    assert_eq!(values[0], Value::Nil);
    assert!(values[1].to_string().starts_with("connect: "));
    assert_eq!(values[2], Value::Integer(libc::ECONNREFUSED.into()));
}

#[test]
fn connect_to_unresolvable_host() {
    let adapter = Adapter::native();

    let values = adapter.call("tcpconnect", &["no such host.invalid".into(), 80.into()]).unwrap();

    assert_eq!(
        values,
        vec![Value::Nil, Value::from("can't resolve: no such host.invalid"), Value::Integer(0)]
    );
}

#[test]
fn close_twice_reports_bad_descriptor() {
    let adapter = Adapter::native();
    let (server, _) = listen(&adapter);

    assert_eq!(adapter.call("close", &[server.into()]).unwrap(), vec![Value::Boolean(true)]);

    let values = adapter.call("close", &[server.into()]).unwrap();

    assert_eq!(values.len(), 3);
    assert_eq!(values[0], Value::Boolean(false));
    assert_eq!(values[2], Value::Integer(ErrorCode::BadDescriptor.code().into()));
}

#[test]
fn option_on_non_socket() {
    let adapter = Adapter::native();
    let (reader, writer) = nix::unistd::pipe().unwrap();

    let values = adapter.call("tcpkeepalive", &[reader.into()]).unwrap();
    assert_eq!(values[2], Value::Integer(ErrorCode::NotSocket.code().into()));

    close_all(&adapter, &[reader, writer]);
}

#[test]
fn oversized_read_fails_for_any_descriptor() {
    let adapter = Adapter::native();

    for fd in [0, 1, 2, 1_000_000].iter() {
        let error = adapter
            .call("read", &[(*fd).into(), (RECV_BUF_SIZE as i64 + 1).into()])
            .unwrap_err();

        assert!(matches!(error, ArgumentError::BufferTooLarge { .. }));
    }
}

#[test]
fn bind_address_must_be_an_ip() {
    let adapter = Adapter::native();

    let values = adapter.call("tcpserver", &[0.into(), "localhost".into()]).unwrap();

    assert_eq!(values[0], Value::Nil);
    assert_eq!(values[1], Value::from("invalid bind address"));
}
