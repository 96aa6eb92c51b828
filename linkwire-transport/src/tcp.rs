//! TCP transport

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use linkwire_types::constants::{
    CLOSE_RETRY_DELAY, CLOSE_RETRY_LIMIT, DEFAULT_MAX_READ_BYTES, DEFAULT_READ_TIMEOUT,
};
use dns_lookup::{getaddrinfo, AddrInfoHints, SockType};
use linkwire_types::Endpoint;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::{debug, trace, warn};

use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::{error::*, ReadOutcome, Transport};

/// Blocking TCP transport
///
/// Owns at most one connection. `read` waits no longer than the receive
/// timeout, so the caller's loop keeps turning while the link is idle.
///
/// # Examples
///
/// ```no_run
/// use linkwire_transport::{ReadOutcome, TcpTransport, Transport};
///
/// let mut transport = TcpTransport::new();
/// transport.configure("127.0.0.1", "8442")?;
/// transport.connect()?;
///
/// transport.write(b"ping")?;
///
/// let mut buf = vec![0u8; transport.available()];
/// match transport.read(&mut buf) {
///     ReadOutcome::Received(n) => println!("{:02X?}", &buf[..n]),
///     ReadOutcome::NoData => println!("idle"),
///     ReadOutcome::Fatal(e) => println!("lost: {}", e),
/// }
/// # Ok::<(), linkwire_transport::Error>(())
/// ```
pub struct TcpTransport {
    endpoint: Option<Endpoint>,
    stream: Option<TcpStream>,
    connect_timeout: Option<Duration>,
    read_timeout: Duration,
    max_read_bytes: usize,
    diagnostics: Box<dyn Diagnostics + Send>,
}

impl TcpTransport {
    /// Create an unconfigured transport
    pub fn new() -> Self {
        Self {
            endpoint: None,
            stream: None,
            connect_timeout: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
            diagnostics: Box::new(TracingDiagnostics),
        }
    }

    /// Create a transport already pointed at `endpoint`
    pub fn for_endpoint(endpoint: Endpoint) -> Self {
        let mut transport = Self::new();
        transport.endpoint = Some(endpoint);
        transport
    }

    /// Bound connection establishment (default: left to the OS)
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set receive timeout (minimum 1ms)
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Set the capacity hint reported by `available` (minimum 1)
    pub fn with_max_read_bytes(mut self, max: usize) -> Self {
        self.max_read_bytes = max.max(1);
        self
    }

    /// Route lifecycle messages somewhere other than `tracing`
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + Send + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Address of the connected peer
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.as_ref().and_then(|s| s.peer_addr().ok())
    }

    /// Try every resolved candidate in order; the first full success wins
    fn establish(&self, endpoint: &Endpoint) -> Result<TcpStream> {
        let candidates = resolve(endpoint)?;

        let mut last_error = None;
        for addr in candidates {
            match self.open(addr) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!("Candidate {} failed: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| Error::Resolution(format!("no addresses found for {}", endpoint))))
    }

    /// Socket, connect and options for one address; dropped on any failure
    fn open(&self, addr: SocketAddr) -> Result<TcpStream> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))
            .map_err(Error::SocketCreation)?;

        let target = SockAddr::from(addr);
        let connected = match self.connect_timeout {
            Some(timeout) => socket.connect_timeout(&target, timeout),
            None => socket.connect(&target),
        };
        connected.map_err(|source| match source.kind() {
            io::ErrorKind::TimedOut if self.connect_timeout.is_some() => {
                Error::ConnectionTimeout(addr)
            }
            _ => Error::Connect { addr, source },
        })?;

        let stream: TcpStream = socket.into();

        // Reads must come back within the timeout; small frames must not wait on Nagle
        stream
            .set_read_timeout(Some(self.read_timeout))
            .map_err(Error::SocketOption)?;
        stream.set_nodelay(true).map_err(Error::SocketOption)?;

        Ok(stream)
    }

    fn fail_read(&mut self, error: Error) -> ReadOutcome {
        if let Some(endpoint) = self.endpoint.as_ref() {
            self.diagnostics.connection_lost(endpoint, &error);
        }
        self.disconnect();
        ReadOutcome::Fatal(error)
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TcpTransport {
    fn configure(&mut self, host: &str, service: &str) -> Result<()> {
        if self.connected() {
            return Err(Error::AlreadyConnected);
        }

        self.endpoint = Some(Endpoint::new(host, service)?);
        Ok(())
    }

    fn connect(&mut self) -> Result<()> {
        if self.connected() {
            return Err(Error::AlreadyConnected);
        }

        let endpoint = self.endpoint.clone().ok_or(Error::NotConfigured)?;

        self.diagnostics.connecting(&endpoint);

        match self.establish(&endpoint) {
            Ok(stream) => {
                debug!("Connected to {} ({:?})", endpoint, stream.peer_addr().ok());
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                self.diagnostics.connect_failed(&endpoint, &e);
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.remote_addr());
            close(stream);
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        let Some(stream) = self.stream.as_mut() else {
            return ReadOutcome::Fatal(Error::NotConnected);
        };

        if buf.is_empty() {
            return ReadOutcome::NoData;
        }

        match stream.read(buf) {
            Ok(0) => self.fail_read(Error::ConnectionClosed),
            Ok(n) => {
                trace!("Received {} bytes: {:02X?}", n, &buf[..n.min(16)]);
                ReadOutcome::Received(n)
            }
            Err(e) if is_idle(&e) => ReadOutcome::NoData,
            Err(e) => {
                warn!("Read error: {}", e);
                self.fail_read(Error::Io(e))
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {:02X?}", buf.len(), &buf[..buf.len().min(16)]);

        // No disconnect here; a broken link surfaces on the next read
        stream.write(buf).map_err(|e| {
            warn!("Write error: {}", e);
            Error::Io(e)
        })
    }

    fn connected(&self) -> bool {
        self.stream.is_some()
    }

    fn available(&self) -> usize {
        self.max_read_bytes
    }

    fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }
}

impl TcpTransport {
    fn remote_addr(&self) -> String {
        self.endpoint
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "<unconfigured>".to_string())
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.connected() {
            warn!("TCP transport dropped while still connected");
            self.disconnect();
        }
    }
}

/// Resolve to an owned list of candidates of either family
///
/// Decimal ports go through the std resolver. Named services are handed to
/// `getaddrinfo`, which consults the system services database.
fn resolve(endpoint: &Endpoint) -> Result<Vec<SocketAddr>> {
    let resolution = |e: io::Error| Error::Resolution(format!("{}: {}", endpoint, e));

    let addrs: Vec<SocketAddr> = match endpoint.port() {
        Some(port) => (endpoint.host(), port)
            .to_socket_addrs()
            .map_err(resolution)?
            .collect(),
        None => {
            let hints = AddrInfoHints {
                socktype: SockType::Stream.into(),
                ..AddrInfoHints::default()
            };
            // The iterator owns the addrinfo list and frees it on drop
            getaddrinfo(Some(endpoint.host()), Some(endpoint.service()), Some(hints))
                .map_err(|e| resolution(e.into()))?
                .filter_map(|info| info.ok())
                .map(|info| info.sockaddr)
                .collect()
        }
    };

    if addrs.is_empty() {
        return Err(Error::Resolution(format!("no addresses found for {}", endpoint)));
    }

    trace!("Resolved {} to {:?}", endpoint, addrs);
    Ok(addrs)
}

/// Conditions where a read simply found nothing yet
fn is_idle(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// Shut both directions down, retrying interrupted attempts, then release the descriptor
fn close(stream: TcpStream) {
    for attempt in 1..=CLOSE_RETRY_LIMIT {
        match stream.shutdown(Shutdown::Both) {
            Ok(()) => break,
            // Peer already reset the connection
            Err(e) if e.kind() == io::ErrorKind::NotConnected => break,
            Err(e) if is_idle(&e) && attempt < CLOSE_RETRY_LIMIT => {
                trace!("Shutdown attempt {} interrupted: {}", attempt, e);
                thread::sleep(CLOSE_RETRY_DELAY);
            }
            Err(e) => {
                warn!("Shutdown failed after {} attempts: {}", attempt, e);
                break;
            }
        }
    }
    drop(stream);
}
