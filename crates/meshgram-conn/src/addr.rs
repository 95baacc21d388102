use std::fmt;
use std::net::SocketAddr;

use meshgram_frame::Coords;

/// A connection-level peer address.
///
/// The mesh layer addresses peers by coordinate path. Underlay endpoints —
/// the opaque handles the unaddressed transports use — are representable too,
/// so a caller passing one to a mesh operation gets an explicit address
/// family error instead of a silent misroute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addr {
    /// A position in the mesh's spanning-tree addressing scheme.
    Coords(Coords),
    /// An underlay transport endpoint.
    Endpoint(SocketAddr),
}

impl Addr {
    /// The coordinate path, if this is a mesh address.
    pub fn coords(&self) -> Option<&Coords> {
        match self {
            Addr::Coords(coords) => Some(coords),
            Addr::Endpoint(_) => None,
        }
    }
}

impl From<Coords> for Addr {
    fn from(coords: Coords) -> Self {
        Addr::Coords(coords)
    }
}

impl From<SocketAddr> for Addr {
    fn from(endpoint: SocketAddr) -> Self {
        Addr::Endpoint(endpoint)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addr::Coords(coords) => coords.fmt(f),
            Addr::Endpoint(endpoint) => endpoint.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_accessor() {
        let mesh = Addr::from(Coords::from(vec![1, 2]));
        assert_eq!(mesh.coords(), Some(&Coords::from(vec![1, 2])));

        let underlay = Addr::from("127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(underlay.coords(), None);
    }

    #[test]
    fn display_delegates() {
        assert_eq!(Addr::from(Coords::from(vec![3])).to_string(), "[3]");
        assert_eq!(
            Addr::from("127.0.0.1:9000".parse::<SocketAddr>().unwrap()).to_string(),
            "127.0.0.1:9000"
        );
    }
}
