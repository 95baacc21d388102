use bytes::{BufMut, Bytes, BytesMut};

use crate::coords::Coords;
use crate::error::{FrameError, Result};

/// Width of one encoded path element, in bytes.
pub const COORD_WIDTH: usize = 8;

/// Size of the length marker preceding the elements.
const MARKER_SIZE: usize = 1;

/// Longest encodable path. The one-byte marker caps the element section at
/// 255 bytes, which holds 31 full elements.
pub const MAX_PATH_ELEMS: usize = u8::MAX as usize / COORD_WIDTH;

/// Encoded size of a path's coordinate prefix (marker + elements).
pub fn prefix_size(coords: &Coords) -> usize {
    MARKER_SIZE + coords.len() * COORD_WIDTH
}

/// An addressed packet: a coordinate path plus an opaque payload.
///
/// The path is the destination on the way out and the sender on the way in;
/// the payload is never interpreted at this layer.
#[derive(Debug, Clone)]
pub struct Packet {
    /// The coordinate path this packet is addressed with.
    pub coords: Coords,
    /// The opaque payload.
    pub payload: Bytes,
}

impl Packet {
    /// Create a new packet.
    pub fn new(coords: Coords, payload: impl Into<Bytes>) -> Self {
        Self {
            coords,
            payload: payload.into(),
        }
    }

    /// The total wire size of this packet (coordinate prefix + payload).
    pub fn wire_size(&self) -> usize {
        prefix_size(&self.coords) + self.payload.len()
    }
}

/// Encode a coordinate path into its wire prefix.
///
/// Wire format:
/// ```text
/// ┌─────────────┬────────────────────────┬──────────────────┐
/// │ Marker (1B) │ Elements (8B LE each)  │ Payload          │
/// │ elem bytes  │ Marker / 8 elements    │ (no delimiter)   │
/// └─────────────┴────────────────────────┴──────────────────┘
/// ```
///
/// The marker counts element bytes only, which makes the prefix
/// self-delimiting: a decoder can split path from payload without knowing
/// the payload's length. The payload itself is delimited by the transport's
/// datagram boundary.
pub fn encode_coords(coords: &Coords, dst: &mut BytesMut) -> Result<()> {
    if coords.len() > MAX_PATH_ELEMS {
        return Err(FrameError::PathTooLong {
            len: coords.len(),
            max: MAX_PATH_ELEMS,
        });
    }
    dst.reserve(prefix_size(coords));
    dst.put_u8((coords.len() * COORD_WIDTH) as u8);
    for elem in coords.as_slice() {
        dst.put_u64_le(*elem);
    }
    Ok(())
}

/// Split a coordinate prefix off the front of `buf`.
///
/// Returns the decoded path and the untouched remainder (the payload).
/// Fails on truncated buffers and malformed length markers; never reads
/// past `buf` and never silently truncates.
pub fn chop_coords(buf: &[u8]) -> Result<(Coords, &[u8])> {
    let (&marker, rest) = buf.split_first().ok_or(FrameError::TruncatedPrefix {
        needed: MARKER_SIZE,
        available: 0,
    })?;
    let elem_bytes = marker as usize;
    if elem_bytes % COORD_WIDTH != 0 {
        return Err(FrameError::MalformedPrefix { len: elem_bytes });
    }
    if rest.len() < elem_bytes {
        return Err(FrameError::TruncatedPrefix {
            needed: MARKER_SIZE + elem_bytes,
            available: buf.len(),
        });
    }
    let (elems, remainder) = rest.split_at(elem_bytes);
    let coords = elems
        .chunks_exact(COORD_WIDTH)
        .map(|chunk| u64::from_le_bytes(chunk.try_into().unwrap()))
        .collect();
    Ok((coords, remainder))
}

/// Decode a complete buffer as a coordinate path with no payload.
pub fn decode_coords(buf: &[u8]) -> Result<Coords> {
    let (coords, remainder) = chop_coords(buf)?;
    if !remainder.is_empty() {
        return Err(FrameError::TrailingBytes {
            extra: remainder.len(),
        });
    }
    Ok(coords)
}

/// Encode a full addressed packet (coordinate prefix + payload).
pub fn encode_packet(coords: &Coords, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    encode_coords(coords, dst)?;
    dst.put_slice(payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        for path in [vec![], vec![0], vec![1, 2, 3], vec![u64::MAX, 0, 7]] {
            let coords = Coords::from(path);
            let mut wire = BytesMut::new();
            encode_coords(&coords, &mut wire).unwrap();
            assert_eq!(decode_coords(&wire).unwrap(), coords);
        }
    }

    #[test]
    fn roundtrip_maximum_length_path() {
        let coords: Coords = (0..MAX_PATH_ELEMS as u64).collect();
        let mut wire = BytesMut::new();
        encode_coords(&coords, &mut wire).unwrap();

        assert_eq!(wire.len(), 1 + MAX_PATH_ELEMS * COORD_WIDTH);
        assert_eq!(decode_coords(&wire).unwrap(), coords);
    }

    #[test]
    fn chop_splits_prefix_from_payload() {
        for (path, payload) in [
            (vec![1, 2], b"payload".as_ref()),
            (vec![], b"just bytes".as_ref()),
            (vec![9, 8, 7], b"".as_ref()),
            (vec![], b"".as_ref()),
        ] {
            let coords = Coords::from(path);
            let mut wire = BytesMut::new();
            encode_coords(&coords, &mut wire).unwrap();
            wire.extend_from_slice(payload);

            let (chopped, remainder) = chop_coords(&wire).unwrap();
            assert_eq!(chopped, coords);
            assert_eq!(remainder, payload);
        }
    }

    #[test]
    fn wire_layout_is_byte_exact() {
        let coords = Coords::from(vec![1, 2]);
        let mut wire = BytesMut::new();
        encode_packet(&coords, b"ab", &mut wire).unwrap();

        let mut expected = vec![16u8];
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(&2u64.to_le_bytes());
        expected.extend_from_slice(b"ab");
        assert_eq!(wire.as_ref(), expected.as_slice());
    }

    #[test]
    fn chop_empty_buffer_fails() {
        let err = chop_coords(&[]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::TruncatedPrefix {
                needed: 1,
                available: 0
            }
        ));
    }

    #[test]
    fn chop_truncated_elements_fails() {
        // Marker promises 16 element bytes, only 3 present.
        let err = chop_coords(&[16, 1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::TruncatedPrefix {
                needed: 17,
                available: 4
            }
        ));
    }

    #[test]
    fn chop_misaligned_marker_fails() {
        let err = chop_coords(&[9, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, FrameError::MalformedPrefix { len: 9 }));
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut wire = BytesMut::new();
        encode_coords(&Coords::from(vec![1]), &mut wire).unwrap();
        wire.extend_from_slice(b"xx");

        let err = decode_coords(&wire).unwrap_err();
        assert!(matches!(err, FrameError::TrailingBytes { extra: 2 }));
    }

    #[test]
    fn encode_rejects_overlong_path() {
        let coords: Coords = (0..=MAX_PATH_ELEMS as u64).collect();
        let mut wire = BytesMut::new();

        let err = encode_coords(&coords, &mut wire).unwrap_err();
        assert!(matches!(err, FrameError::PathTooLong { len: 32, max: 31 }));
        assert!(wire.is_empty());
    }

    #[test]
    fn packet_wire_size() {
        let packet = Packet::new(Coords::from(vec![1, 2]), Bytes::from_static(b"four"));
        assert_eq!(packet.wire_size(), 1 + 16 + 4);

        let empty = Packet::new(Coords::new(), Bytes::new());
        assert_eq!(empty.wire_size(), 1);
    }

    #[test]
    fn encode_packet_matches_encode_coords_plus_payload() {
        let coords = Coords::from(vec![3]);
        let mut packet_wire = BytesMut::new();
        encode_packet(&coords, b"tail", &mut packet_wire).unwrap();

        let mut prefix = BytesMut::new();
        encode_coords(&coords, &mut prefix).unwrap();

        assert_eq!(&packet_wire[..prefix.len()], prefix.as_ref());
        assert_eq!(&packet_wire[prefix.len()..], b"tail");
    }
}
