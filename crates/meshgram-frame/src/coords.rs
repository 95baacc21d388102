use std::fmt;

/// A routing coordinate path — a node's position in the mesh's spanning-tree
/// addressing scheme.
///
/// An ordered sequence of non-negative integers, root first. Serves as both
/// routing key and peer address, and is immutable once constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coords(Vec<u64>);

impl Coords {
    /// The empty path (the tree root's own position).
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Path elements, root first.
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Number of elements in the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u64>> for Coords {
    fn from(elems: Vec<u64>) -> Self {
        Self(elems)
    }
}

impl From<&[u64]> for Coords {
    fn from(elems: &[u64]) -> Self {
        Self(elems.to_vec())
    }
}

impl FromIterator<u64> for Coords {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, elem) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{elem}")?;
        }
        write!(f, "]")
    }
}
