use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use bytes::{Bytes, BytesMut};
use meshgram_frame::{encode_packet, prefix_size, Coords, Packet};
use tracing::{debug, trace};

use crate::addr::Addr;
use crate::error::{ConnError, Result};
use crate::router::Router;

/// Inbound delivery callback, invoked with the sender's path and payload.
pub type ReadCallback = Box<dyn FnMut(Coords, Bytes) + Send>;

/// How inbound packets reach the caller.
enum DeliveryMode {
    /// Packets queue until an explicit blocking read consumes them.
    Queue(VecDeque<Packet>),
    /// Packets are pushed synchronously into the installed callback.
    Callback(ReadCallback),
}

struct State {
    closed: bool,
    mode: DeliveryMode,
    read_deadline: Option<Instant>,
    write_deadline: Option<Instant>,
}

struct Shared {
    local: Coords,
    router: Arc<dyn Router>,
    state: Mutex<State>,
    readable: Condvar,
}

/// An addressed, unreliable, packet-oriented connection over a
/// coordinate-routed mesh.
///
/// Cloning yields another handle to the same connection; the routing
/// collaborator holds one for inbound delivery while callers read and write
/// on others. Every state transition goes through one internal lock,
/// acquired in FIFO order — that serialization is the connection's actor:
/// no two mutations of connection state ever interleave.
///
/// Inbound packets reach the caller one of two ways, switchable at runtime:
/// queued for blocking [`read_from`](PacketConn::read_from) calls (the
/// default), or pushed into a callback installed with
/// [`set_read_callback`](PacketConn::set_read_callback). The two modes are
/// mutually exclusive.
#[derive(Clone)]
pub struct PacketConn {
    shared: Arc<Shared>,
}

impl PacketConn {
    /// Create a connection bound to a routing collaborator and a local
    /// coordinate identity.
    pub fn new(local: Coords, router: Arc<dyn Router>) -> Self {
        Self {
            shared: Arc::new(Shared {
                local,
                router,
                state: Mutex::new(State {
                    closed: false,
                    mode: DeliveryMode::Queue(VecDeque::new()),
                    read_deadline: None,
                    write_deadline: None,
                }),
                readable: Condvar::new(),
            }),
        }
    }

    // A panicking delivery callback must not wedge the connection, so lock
    // poisoning is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver one inbound packet from the routing collaborator.
    ///
    /// The sole inbound entry point; it never fails outward. Packets
    /// arriving after [`close`](PacketConn::close) are discarded (and
    /// logged), since there is no caller left to report to. With a callback
    /// installed, the packet is handed to it synchronously on this thread,
    /// serialized against any concurrent mode switch; otherwise it joins
    /// the read queue and wakes one blocked reader.
    pub fn deliver(&self, coords: Coords, payload: Bytes) {
        let mut state = self.lock();
        if state.closed {
            debug!(%coords, len = payload.len(), "discarding packet for closed connection");
            return;
        }
        match &mut state.mode {
            DeliveryMode::Callback(callback) => {
                trace!(%coords, len = payload.len(), "delivering to callback");
                callback(coords, payload);
            }
            DeliveryMode::Queue(queue) => {
                trace!(%coords, len = payload.len(), "queueing for blocking read");
                queue.push_back(Packet::new(coords, payload));
                self.shared.readable.notify_one();
            }
        }
    }

    /// Read one packet, blocking until data arrives, the connection closes,
    /// or the read deadline expires.
    ///
    /// Copies the payload into `buf` (truncating datagram-style if `buf` is
    /// short) and returns the copied length plus the sender's coordinate
    /// path. Fails with [`ConnError::Closed`] once the connection closes —
    /// including while blocked — with [`ConnError::CallbackActive`] whenever
    /// a callback is installed (it never blocks in that mode), and with
    /// [`ConnError::Timeout`] when the read deadline expires first.
    pub fn read_from(&self, buf: &mut [u8]) -> Result<(usize, Coords)> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return Err(ConnError::Closed);
            }
            match &mut state.mode {
                DeliveryMode::Callback(_) => return Err(ConnError::CallbackActive),
                DeliveryMode::Queue(queue) => {
                    if let Some(packet) = queue.pop_front() {
                        let n = packet.payload.len().min(buf.len());
                        buf[..n].copy_from_slice(&packet.payload[..n]);
                        return Ok((n, packet.coords));
                    }
                }
            }
            state = match state.read_deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(ConnError::Timeout);
                    }
                    self.shared
                        .readable
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .shared
                    .readable
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }

    /// Send one packet toward `dst`, fire-and-forget.
    ///
    /// Frames the payload with the destination path and hands the frame
    /// straight to the routing collaborator: no acknowledgement, no retry,
    /// and no backpressure beyond what the collaborator reports
    /// synchronously. Returns the payload length on success. Fails with
    /// [`ConnError::AddrFamily`] when `dst` is not a coordinate path,
    /// without forwarding anything.
    pub fn write_to(&self, buf: &[u8], dst: &Addr) -> Result<usize> {
        {
            let state = self.lock();
            if state.closed {
                return Err(ConnError::Closed);
            }
            if let Some(deadline) = state.write_deadline {
                if Instant::now() >= deadline {
                    return Err(ConnError::Timeout);
                }
            }
        }
        let coords = dst.coords().ok_or(ConnError::AddrFamily)?;

        let mut frame = BytesMut::with_capacity(prefix_size(coords) + buf.len());
        encode_packet(coords, buf, &mut frame)?;
        self.shared.router.forward(frame.freeze())?;
        Ok(buf.len())
    }

    /// Install or remove the asynchronous delivery callback.
    ///
    /// Installing first drains every packet already queued for blocking
    /// reads into the callback, in arrival order, before any new delivery
    /// can interleave; blocked readers wake and fail with
    /// [`ConnError::CallbackActive`]. Removing (`None`) reverts to queue
    /// mode, and packets arriving afterwards queue for future reads.
    ///
    /// The callback runs on the delivering thread while the connection's
    /// internal lock is held: it must not call back into this same
    /// connection's blocking or configuration operations.
    pub fn set_read_callback(&self, callback: Option<ReadCallback>) -> Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(ConnError::Closed);
        }
        match callback {
            Some(mut callback) => {
                if let DeliveryMode::Queue(queue) = &mut state.mode {
                    for packet in queue.drain(..) {
                        callback(packet.coords, packet.payload);
                    }
                }
                state.mode = DeliveryMode::Callback(callback);
            }
            None => state.mode = DeliveryMode::Queue(VecDeque::new()),
        }
        self.shared.readable.notify_all();
        Ok(())
    }

    /// Set the absolute deadline for blocking reads. `None` clears it.
    ///
    /// Serialized through the connection's internal lock; a blocked read
    /// wakes to observe the new deadline immediately. Do not call this from
    /// inside the connection's own delivery callback — the lock is not
    /// reentrant.
    pub fn set_read_deadline(&self, deadline: Option<Instant>) -> Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(ConnError::Closed);
        }
        state.read_deadline = deadline;
        self.shared.readable.notify_all();
        Ok(())
    }

    /// Set the absolute deadline for writes. `None` clears it.
    ///
    /// Writes are fire-and-forget and never block, so an expired write
    /// deadline fails subsequent writes immediately rather than unblocking
    /// anything.
    pub fn set_write_deadline(&self, deadline: Option<Instant>) -> Result<()> {
        let mut state = self.lock();
        if state.closed {
            return Err(ConnError::Closed);
        }
        state.write_deadline = deadline;
        Ok(())
    }

    /// Set both the read and write deadlines at once.
    pub fn set_deadline(&self, deadline: Option<Instant>) -> Result<()> {
        self.set_read_deadline(deadline)?;
        self.set_write_deadline(deadline)
    }

    /// Close the connection.
    ///
    /// Idempotent and terminal: every subsequent operation, and every
    /// operation blocked at the moment of the call, fails with
    /// [`ConnError::Closed`]. Queued packets are dropped — nothing can read
    /// them anymore.
    pub fn close(&self) {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        state.mode = DeliveryMode::Queue(VecDeque::new());
        self.shared.readable.notify_all();
        debug!(local = %self.shared.local, "connection closed");
    }

    /// The connection's own routable identity, constant for its lifetime.
    pub fn local_addr(&self) -> Coords {
        self.shared.local.clone()
    }

    /// True once [`close`](PacketConn::close) has run.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl fmt::Debug for PacketConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("PacketConn")
            .field("local", &self.shared.local)
            .field("closed", &state.closed)
            .field(
                "mode",
                &match state.mode {
                    DeliveryMode::Queue(ref queue) => format!("queue({})", queue.len()),
                    DeliveryMode::Callback(_) => "callback".to_string(),
                },
            )
            .finish()
    }
}
