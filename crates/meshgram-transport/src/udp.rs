use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::Datagram;

/// Largest UDP payload over IPv4 (65535 minus IP and UDP headers).
pub const MAX_UDP_PAYLOAD: usize = 65_507;

/// Connected UDP datagram transport.
///
/// Binds a local socket and connects it to a single peer, so sends and
/// receives become a plain unaddressed byte exchange with that peer. The
/// socket closes on drop.
#[derive(Debug)]
pub struct UdpEndpoint {
    socket: UdpSocket,
    max_datagram: usize,
}

impl UdpEndpoint {
    /// Bind a local UDP socket. Use port 0 for an ephemeral port.
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr).map_err(|e| TransportError::Bind { addr, source: e })?;
        info!(%addr, "bound udp endpoint");
        Ok(Self {
            socket,
            max_datagram: MAX_UDP_PAYLOAD,
        })
    }

    /// Override the maximum datagram size.
    ///
    /// Useful when the path MTU is known to be tighter than the UDP maximum.
    pub fn with_max_datagram(mut self, max_datagram: usize) -> Self {
        self.max_datagram = max_datagram;
        self
    }

    /// Connect this endpoint to a single peer.
    pub fn connect(&self, peer: SocketAddr) -> Result<()> {
        self.socket.connect(peer).map_err(|e| TransportError::Connect {
            addr: peer,
            source: e,
        })?;
        debug!(%peer, "connected udp endpoint");
        Ok(())
    }

    /// The local socket address.
    pub fn local_endpoint(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl Datagram for UdpEndpoint {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.socket.recv(buf)?)
    }

    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.len() > self.max_datagram {
            return Err(TransportError::DatagramTooLarge {
                size: buf.len(),
                max: self.max_datagram,
            });
        }
        Ok(self.socket.send(buf)?)
    }

    fn max_datagram(&self) -> usize {
        self.max_datagram
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        Ok(self.socket.set_read_timeout(timeout)?)
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        Ok(self.socket.set_write_timeout(timeout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected_pair() -> (UdpEndpoint, UdpEndpoint) {
        let a = UdpEndpoint::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let b = UdpEndpoint::bind("127.0.0.1:0".parse().unwrap()).unwrap();
        a.connect(b.local_endpoint().unwrap()).unwrap();
        b.connect(a.local_endpoint().unwrap()).unwrap();
        (a, b)
    }

    #[test]
    fn roundtrip_over_loopback() {
        let (mut a, mut b) = connected_pair();

        a.send(b"hello").unwrap();

        let mut buf = [0u8; 32];
        let n = b.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[test]
    fn oversized_send_rejected() {
        let (a, _b) = connected_pair();
        let mut a = a.with_max_datagram(8);

        let err = a.send(&[0u8; 9]).unwrap_err();
        assert!(matches!(
            err,
            TransportError::DatagramTooLarge { size: 9, max: 8 }
        ));
    }

    #[test]
    fn read_timeout_expires() {
        let (mut a, _b) = connected_pair();
        a.set_read_timeout(Some(Duration::from_millis(20))).unwrap();

        let mut buf = [0u8; 8];
        let err = a.recv(&mut buf).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn short_buffer_truncates() {
        let (mut a, mut b) = connected_pair();

        a.send(b"truncate-me").unwrap();

        let mut buf = [0u8; 4];
        let n = b.recv(&mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf[..n], b"trun");
    }
}
