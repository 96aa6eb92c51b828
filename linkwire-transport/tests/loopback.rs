//! Transport behaviour against real loopback peers

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use linkwire_transport::{Error, ReadOutcome, TcpTransport, Transport};
use linkwire_types::Endpoint;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Accept one connection and echo everything back until the client leaves
fn spawn_echo() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    let handle = thread::spawn(move || {
        let (mut peer, _) = listener.accept().unwrap();
        let mut buf = [0u8; 512];
        loop {
            match peer.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if peer.write_all(&buf[..n]).is_err() {
                        break;
                    }
                }
            }
        }
    });

    (port, handle)
}

fn connected_to(port: &str) -> TcpTransport {
    let mut transport = TcpTransport::new().with_read_timeout(Duration::from_millis(200));
    transport.configure("127.0.0.1", port).unwrap();
    transport.connect().unwrap();
    transport
}

/// Accumulate reads until `len` bytes arrived
fn read_exactly(transport: &mut TcpTransport, len: usize) -> Vec<u8> {
    let mut received = Vec::with_capacity(len);
    let mut buf = vec![0u8; transport.available()];
    let deadline = Instant::now() + Duration::from_secs(5);

    while received.len() < len && Instant::now() < deadline {
        let want = (len - received.len()).min(buf.len());
        match transport.read(&mut buf[..want]) {
            ReadOutcome::Received(n) => received.extend_from_slice(&buf[..n]),
            ReadOutcome::NoData => continue,
            ReadOutcome::Fatal(e) => panic!("connection lost: {}", e),
        }
    }

    received
}

fn write_all(transport: &mut TcpTransport, mut data: &[u8]) {
    while !data.is_empty() {
        let n = transport.write(data).unwrap();
        data = &data[n..];
    }
}

#[test]
fn echo_five_bytes() {
    let (port, echo) = spawn_echo();
    let mut transport = connected_to(&port);
    assert!(transport.connected());

    assert_eq!(transport.write(b"hello").unwrap(), 5);
    assert_eq!(read_exactly(&mut transport, 5), b"hello".to_vec());

    transport.disconnect();
    assert!(!transport.connected());
    echo.join().unwrap();
}

#[test]
fn refused_port_fails_fast() {
    // Only meaningful when nothing is listening on 9999
    let Ok(probe) = TcpListener::bind("127.0.0.1:9999") else {
        return;
    };
    drop(probe);

    let mut transport = TcpTransport::new();
    transport.configure("127.0.0.1", "9999").unwrap();

    let started = Instant::now();
    let result = transport.connect();

    assert!(matches!(result, Err(Error::Connect { .. })));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!transport.connected());
}

#[test]
fn unresolvable_host_fails() {
    let mut transport = TcpTransport::for_endpoint(Endpoint::new("host.invalid", "8442").unwrap());

    assert!(matches!(transport.connect(), Err(Error::Resolution(_))));
    assert!(!transport.connected());
}

#[test]
fn idle_connection_survives_timeouts() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    let mut transport = connected_to(&port);
    let (_peer, _) = listener.accept().unwrap();

    let mut buf = [0u8; 8];
    for _ in 0..3 {
        assert!(matches!(transport.read(&mut buf), ReadOutcome::NoData));
        assert!(transport.connected());
    }
}

#[test]
fn partial_reads_accumulate() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    let mut transport = connected_to(&port);
    let (mut peer, _) = listener.accept().unwrap();

    let payload: Vec<u8> = (0..64).collect();
    peer.write_all(&payload).unwrap();

    // A buffer smaller than the payload forces several reads
    let mut buf = [0u8; 10];
    let mut received = Vec::new();
    while received.len() < payload.len() {
        match transport.read(&mut buf) {
            ReadOutcome::Received(n) => {
                assert!(n <= buf.len());
                received.extend_from_slice(&buf[..n]);
            }
            ReadOutcome::NoData => {}
            ReadOutcome::Fatal(e) => panic!("connection lost: {}", e),
        }
    }

    assert_eq!(received, payload);
}

#[test]
fn peer_close_tears_down_once() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    let mut transport = connected_to(&port);
    let (mut peer, _) = listener.accept().unwrap();

    peer.write_all(b"bye").unwrap();
    drop(peer);

    // Pending data is still delivered before the close is seen
    assert_eq!(read_exactly(&mut transport, 3), b"bye".to_vec());

    let mut buf = [0u8; 8];
    let fatal = loop {
        match transport.read(&mut buf) {
            ReadOutcome::NoData => continue,
            other => break other,
        }
    };
    assert!(matches!(fatal, ReadOutcome::Fatal(Error::ConnectionClosed)));
    assert!(!transport.connected());

    // Engine-side reconnect reuses the endpoint
    transport.connect().unwrap();
    assert!(transport.connected());
    drop(listener);
}

#[test]
fn reconnect_after_disconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    let mut transport = connected_to(&port);

    for _ in 0..3 {
        transport.disconnect();
        assert!(!transport.connected());
        transport.disconnect();

        transport.connect().unwrap();
        assert!(transport.connected());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn bytes_arrive_unchanged(data in prop::collection::vec(any::<u8>(), 1..=256usize)) {
        let (port, echo) = spawn_echo();
        let mut transport = connected_to(&port);

        write_all(&mut transport, &data);
        let received = read_exactly(&mut transport, data.len());
        prop_assert_eq!(received, data);

        transport.disconnect();
        echo.join().unwrap();
    }
}
