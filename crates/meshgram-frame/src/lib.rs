//! Self-delimiting coordinate framing for mesh datagrams.
//!
//! This is the wire layer of meshgram. Every addressed datagram starts with
//! an encoded coordinate path:
//! - A 1-byte length marker counting the element bytes
//! - The path elements, 8 bytes little-endian each
//! - The opaque payload, delimited by the datagram boundary itself
//!
//! The marker makes the prefix self-delimiting: [`chop_coords`] can split
//! path from payload without knowing the payload's length in advance, which
//! is what lets [`CoordFramed`] turn any unaddressed [`Datagram`] transport
//! into an addressed one.
//!
//! [`Datagram`]: meshgram_transport::Datagram

pub mod adapter;
pub mod codec;
pub mod coords;
pub mod error;

pub use adapter::CoordFramed;
pub use codec::{
    chop_coords, decode_coords, encode_coords, encode_packet, prefix_size, Packet, COORD_WIDTH,
    MAX_PATH_ELEMS,
};
pub use coords::Coords;
pub use error::{FrameError, Result};
