//! Addressed, packet-oriented connections for coordinate-routed mesh
//! networks.
//!
//! meshgram lets callers exchange opaque datagrams with peers identified by
//! routing coordinates — positions in a spanning-tree addressing scheme —
//! rather than by IP addresses. Connections are unreliable and
//! fire-and-forget; reliability belongs to the caller.
//!
//! # Crate Structure
//!
//! - [`transport`] — Unaddressed datagram transports (UDP, in-memory)
//! - [`frame`] — The coordinate codec and the framing adapter
//! - [`conn`] — The addressed packet connection and its routing seam

/// Re-export transport types.
pub mod transport {
    pub use meshgram_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use meshgram_frame::*;
}

/// Re-export connection types.
pub mod conn {
    pub use meshgram_conn::*;
}
