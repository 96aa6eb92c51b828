//! Connect, send one frame and wait for a reply

use std::time::{Duration, Instant};

use linkwire::{Endpoint, ReadOutcome, TcpTransport, Transport};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .init();

    // Change to your server, e.g. LINKWIRE_SERVER=127.0.0.1:8442
    let endpoint = match std::env::var("LINKWIRE_SERVER") {
        Ok(addr) => addr.parse()?,
        Err(_) => Endpoint::default_server(),
    };

    println!("Connecting to {}...", endpoint);

    let mut transport = TcpTransport::for_endpoint(endpoint)
        .with_connect_timeout(Duration::from_secs(10));

    transport.connect()?;
    println!("✓ Connected to {:?}", transport.peer_addr());

    let sent = transport.write(b"ping")?;
    println!("✓ Sent {} bytes", sent);

    let mut buf = vec![0u8; transport.available()];
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        match transport.read(&mut buf) {
            ReadOutcome::Received(n) => {
                println!("✓ Received {:02X?}", &buf[..n]);
                break;
            }
            ReadOutcome::NoData => continue,
            ReadOutcome::Fatal(e) => {
                println!("✗ Connection lost: {}", e);
                break;
            }
        }
    }

    transport.disconnect();
    println!("✓ Disconnected");

    Ok(())
}
