//! Minimal loopback demo — two framed UDP endpoints exchange one addressed
//! datagram.
//!
//! Run with:
//!   cargo run --example loopback

use meshgram::frame::{CoordFramed, Coords};
use meshgram::transport::UdpEndpoint;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let a = UdpEndpoint::bind("127.0.0.1:0".parse()?)?;
    let b = UdpEndpoint::bind("127.0.0.1:0".parse()?)?;
    a.connect(b.local_endpoint()?)?;
    b.connect(a.local_endpoint()?)?;

    let mut a = CoordFramed::new(a);
    let mut b = CoordFramed::new(b);

    let from = Coords::from(vec![1, 2, 3]);
    a.send_to(b"hello mesh", &from)?;

    let mut buf = [0u8; 64];
    let (n, remote) = b.recv_from(&mut buf)?;
    eprintln!(
        "received {} bytes from {}: {}",
        n,
        remote,
        String::from_utf8_lossy(&buf[..n])
    );
    Ok(())
}
