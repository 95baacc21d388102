use std::time::Duration;

use crate::error::Result;

/// A point-to-point datagram link with no notion of mesh addressing.
///
/// Implementations move whole datagrams of raw bytes between two fixed ends.
/// The peer is an opaque handle chosen at construction time (a connected UDP
/// socket, one side of an in-memory pair); nothing at this layer identifies
/// senders or receivers beyond that. Closing is the owner's concern — every
/// implementation releases its resources on drop.
pub trait Datagram {
    /// Receive one datagram into `buf`, returning the number of bytes copied.
    ///
    /// Datagram boundaries are preserved: one call consumes exactly one
    /// datagram. If `buf` is shorter than the datagram, the excess is
    /// discarded (standard datagram truncation).
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Send one datagram, returning the number of bytes accepted.
    ///
    /// Datagrams are atomic: the transport accepts all of `buf` or fails.
    /// Payloads above [`max_datagram`](Self::max_datagram) fail with
    /// [`TransportError::DatagramTooLarge`](crate::TransportError::DatagramTooLarge).
    fn send(&mut self, buf: &[u8]) -> Result<usize>;

    /// Largest datagram this transport can carry, in bytes.
    fn max_datagram(&self) -> usize;

    /// Bound the time a blocking [`recv`](Self::recv) may wait.
    ///
    /// `None` blocks indefinitely. An expired timeout surfaces as an error
    /// for which [`TransportError::is_timeout`](crate::TransportError::is_timeout)
    /// returns true.
    fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()>;

    /// Bound the time a blocking [`send`](Self::send) may wait.
    ///
    /// `None` blocks indefinitely.
    fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()>;
}
