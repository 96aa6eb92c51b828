//! Engine-style loop: heartbeat, poll, reconnect with backoff

use std::thread::sleep;
use std::time::{Duration, Instant};

use linkwire::{Endpoint, TcpTransport, Transport};
use tracing::{debug, info, warn};

const HEARTBEAT: Duration = Duration::from_secs(10);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let endpoint: Endpoint = std::env::var("LINKWIRE_SERVER")
        .unwrap_or_else(|_| "127.0.0.1:8442".to_string())
        .parse()?;

    let mut transport = TcpTransport::for_endpoint(endpoint);
    let mut buf = vec![0u8; transport.available()];
    let mut backoff = Duration::from_secs(1);
    let mut last_beat: Option<Instant> = None;

    loop {
        if !transport.connected() {
            // Retry policy lives here, not in the transport
            if let Err(e) = transport.connect() {
                warn!("Retrying in {:?}: {}", backoff, e);
                sleep(backoff);
                backoff = (backoff * 2).min(MAX_BACKOFF);
                continue;
            }
            backoff = Duration::from_secs(1);
            // Fresh connection: beat straight away
            last_beat = None;
        }

        if last_beat.is_none_or(|t| t.elapsed() >= HEARTBEAT) {
            match transport.write(b"\x06\x00\x00\x00\x00") {
                Ok(n) => {
                    info!("Heartbeat sent ({} bytes)", n);
                    last_beat = Some(Instant::now());
                }
                Err(e) if e.is_transient() => debug!("Heartbeat deferred: {}", e),
                // Write errors don't disconnect; the next read will notice
                Err(e) => {
                    warn!("Heartbeat failed: {}", e);
                    last_beat = Some(Instant::now());
                }
            }
        }

        match transport.read(&mut buf).into_result() {
            Ok(0) => {}
            Ok(n) => info!("Received {:02X?}", &buf[..n]),
            Err(e) => warn!("Connection lost: {}", e),
        }
    }
}
