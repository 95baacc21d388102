use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;

use crate::error::{Result, TransportError};
use crate::traits::Datagram;

/// In-process datagram link, created as a connected pair.
///
/// Datagrams travel over unbounded channels, one queue per direction, so the
/// link preserves datagram boundaries and arrival order without touching the
/// network. Useful for tests and deterministic simulation where a real
/// socket would add noise.
#[derive(Debug)]
pub struct MemoryLink {
    tx: Sender<Bytes>,
    rx: Receiver<Bytes>,
    max_datagram: usize,
    read_timeout: Mutex<Option<Duration>>,
}

impl MemoryLink {
    /// Create a connected pair with the given maximum datagram size.
    pub fn pair(max_datagram: usize) -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::channel();
        let (b_tx, a_rx) = mpsc::channel();
        (
            Self {
                tx: a_tx,
                rx: a_rx,
                max_datagram,
                read_timeout: Mutex::new(None),
            },
            Self {
                tx: b_tx,
                rx: b_rx,
                max_datagram,
                read_timeout: Mutex::new(None),
            },
        )
    }
}

impl Datagram for MemoryLink {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        let timeout = *self
            .read_timeout
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let datagram = match timeout {
            Some(timeout) => self.rx.recv_timeout(timeout).map_err(|err| match err {
                RecvTimeoutError::Timeout => TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "read timed out",
                )),
                RecvTimeoutError::Disconnected => TransportError::Shutdown,
            })?,
            None => self.rx.recv().map_err(|_| TransportError::Shutdown)?,
        };
        let n = datagram.len().min(buf.len());
        buf[..n].copy_from_slice(&datagram[..n]);
        Ok(n)
    }

    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.len() > self.max_datagram {
            return Err(TransportError::DatagramTooLarge {
                size: buf.len(),
                max: self.max_datagram,
            });
        }
        self.tx
            .send(Bytes::copy_from_slice(buf))
            .map_err(|_| TransportError::Shutdown)?;
        Ok(buf.len())
    }

    fn max_datagram(&self) -> usize {
        self.max_datagram
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        *self
            .read_timeout
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = timeout;
        Ok(())
    }

    // In-memory sends never block, so the write timeout has nothing to bound.
    fn set_write_timeout(&self, _timeout: Option<Duration>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_both_directions() {
        let (mut a, mut b) = MemoryLink::pair(1024);

        a.send(b"ping").unwrap();
        b.send(b"pong").unwrap();

        let mut buf = [0u8; 16];
        let n = b.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"ping");
        let n = a.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"pong");
    }

    #[test]
    fn preserves_datagram_boundaries() {
        let (mut a, mut b) = MemoryLink::pair(1024);

        a.send(b"one").unwrap();
        a.send(b"two").unwrap();

        let mut buf = [0u8; 16];
        let n = b.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"one");
        let n = b.recv(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"two");
    }

    #[test]
    fn zero_length_datagram() {
        let (mut a, mut b) = MemoryLink::pair(1024);

        a.send(b"").unwrap();

        let mut buf = [0u8; 16];
        let n = b.recv(&mut buf).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn oversized_send_rejected() {
        let (mut a, _b) = MemoryLink::pair(4);

        let err = a.send(b"12345").unwrap_err();
        assert!(matches!(
            err,
            TransportError::DatagramTooLarge { size: 5, max: 4 }
        ));
    }

    #[test]
    fn read_timeout_expires() {
        let (mut a, _b) = MemoryLink::pair(1024);
        a.set_read_timeout(Some(Duration::from_millis(10))).unwrap();

        let mut buf = [0u8; 8];
        let err = a.recv(&mut buf).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn hung_up_peer_is_shutdown() {
        let (mut a, b) = MemoryLink::pair(1024);
        drop(b);

        let err = a.send(b"x").unwrap_err();
        assert!(matches!(err, TransportError::Shutdown));

        let mut buf = [0u8; 8];
        let err = a.recv(&mut buf).unwrap_err();
        assert!(matches!(err, TransportError::Shutdown));
    }

    #[test]
    fn short_buffer_truncates() {
        let (mut a, mut b) = MemoryLink::pair(1024);

        a.send(b"abcdef").unwrap();

        let mut buf = [0u8; 3];
        let n = b.recv(&mut buf).unwrap();
        assert_eq!(n, 3);
        assert_eq!(&buf[..n], b"abc");
    }
}
