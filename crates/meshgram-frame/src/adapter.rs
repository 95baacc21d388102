use std::time::Duration;

use bytes::BytesMut;
use meshgram_transport::Datagram;
use tracing::trace;

use crate::codec::{chop_coords, encode_coords, prefix_size};
use crate::coords::Coords;
use crate::error::Result;

/// Layers coordinate addressing onto an unaddressed datagram transport.
///
/// Every outbound datagram is prefixed with an encoded coordinate path;
/// every inbound datagram has its prefix chopped off and decoded. The
/// adapter owns no state beyond a scratch buffer sized to the transport's
/// maximum unit — timeouts pass straight through, and anything
/// transport-specific (local endpoint, close-on-drop) is reachable via
/// [`get_ref`](CoordFramed::get_ref).
pub struct CoordFramed<T> {
    inner: T,
    scratch: Vec<u8>,
}

impl<T: Datagram> CoordFramed<T> {
    /// Wrap an unaddressed transport.
    pub fn new(inner: T) -> Self {
        // The scratch buffer must hold any datagram the transport can
        // deliver, or received coordinate prefixes could be torn.
        let scratch = vec![0u8; inner.max_datagram()];
        Self { inner, scratch }
    }

    /// Receive one addressed datagram.
    ///
    /// Copies only the payload into `buf` (truncating datagram-style if
    /// `buf` is short) and returns the copied length plus the sender's
    /// decoded coordinate path. The prefix never lands in `buf` and is
    /// never counted in the returned length. A datagram whose prefix does
    /// not chop cleanly surfaces the framing error — never an empty read.
    pub fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, Coords)> {
        let received = self.inner.recv(&mut self.scratch)?;
        let (coords, payload) = chop_coords(&self.scratch[..received])?;
        let n = payload.len().min(buf.len());
        buf[..n].copy_from_slice(&payload[..n]);
        trace!(%coords, payload_len = payload.len(), "received framed datagram");
        Ok((n, coords))
    }

    /// Send one addressed datagram, stamped with `local` as its path.
    ///
    /// Prepends the encoded path and hands the combined frame to the
    /// underlying transport. Returns the number of payload bytes accepted;
    /// the prefix is excluded from the count.
    pub fn send_to(&mut self, payload: &[u8], local: &Coords) -> Result<usize> {
        let mut frame = BytesMut::with_capacity(prefix_size(local) + payload.len());
        encode_coords(local, &mut frame)?;
        let prefix_len = frame.len();
        frame.extend_from_slice(payload);

        let sent = self.inner.send(&frame)?;
        trace!(%local, payload_len = payload.len(), "sent framed datagram");
        Ok(sent - prefix_len)
    }

    /// Largest payload one datagram can carry when stamped with `local`.
    pub fn max_payload(&self, local: &Coords) -> usize {
        self.inner.max_datagram().saturating_sub(prefix_size(local))
    }

    /// Bound the time a blocking receive may wait. Pass-through.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        Ok(self.inner.set_read_timeout(timeout)?)
    }

    /// Bound the time a blocking send may wait. Pass-through.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        Ok(self.inner.set_write_timeout(timeout)?)
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the adapter and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
