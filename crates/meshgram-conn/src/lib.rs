//! Addressed packet connections over a coordinate-routed mesh.
//!
//! This is the high-level layer of meshgram. A [`PacketConn`] pairs a local
//! coordinate identity with a routing collaborator: outbound packets are
//! framed and handed to the [`Router`], and inbound packets arrive through
//! [`PacketConn::deliver`] to reach the caller either via blocking reads or
//! an installed callback, switchable at runtime.
//!
//! The connection is unreliable and fire-and-forget by design — no
//! acknowledgement, no retransmission, no ordering beyond what the mesh
//! itself preserves. Reliability belongs to the caller.

pub mod addr;
pub mod conn;
pub mod error;
pub mod router;

pub use addr::Addr;
pub use conn::{PacketConn, ReadCallback};
pub use error::{ConnError, Result};
pub use router::{Router, SinkRouter};
