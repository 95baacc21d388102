use std::sync::{Mutex, PoisonError};

use bytes::Bytes;

use crate::error::Result;

/// Outbound seam to the routing collaborator.
///
/// The forwarding plane behind a [`PacketConn`](crate::PacketConn): it
/// accepts already-framed packets (coordinate prefix + payload) and moves
/// them toward their destination. Inbound, the collaborator calls
/// [`PacketConn::deliver`](crate::PacketConn::deliver) for every packet
/// addressed to the connection's local identity. No acknowledgement flows in
/// either direction.
pub trait Router: Send + Sync {
    /// Hand one framed packet to the forwarding plane.
    ///
    /// Returns synchronously; there is no delivery confirmation. A plane
    /// with a frame-size limit reports
    /// [`ConnError::PacketTooBig`](crate::ConnError::PacketTooBig).
    fn forward(&self, frame: Bytes) -> Result<()>;
}

/// A router that collects forwarded frames instead of routing them.
///
/// A test double, also handy for demos that inspect what would have gone
/// onto the mesh.
#[derive(Debug, Default)]
pub struct SinkRouter {
    frames: Mutex<Vec<Bytes>>,
}

impl SinkRouter {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames forwarded so far, in order.
    pub fn frames(&self) -> Vec<Bytes> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Router for SinkRouter {
    fn forward(&self, frame: Bytes) -> Result<()> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_collects_in_order() {
        let sink = SinkRouter::new();
        sink.forward(Bytes::from_static(b"one")).unwrap();
        sink.forward(Bytes::from_static(b"two")).unwrap();

        let frames = sink.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_ref(), b"one");
        assert_eq!(frames[1].as_ref(), b"two");
    }
}
