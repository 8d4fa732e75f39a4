//! Identifier newtypes.

use std::fmt;

/// Identity of a node in an [`Ast`](crate::Ast).
///
/// A node id is the node's index in its arena, so it is unique within one
/// tree and stable for the tree's lifetime. Ids from different trees must
/// not be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node id from a raw index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The arena index of this node.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw id value.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_index() {
        let id = NodeId::new(7);
        assert_eq!(id.index(), 7);
        assert_eq!(id.as_u32(), 7);
        assert_eq!(NodeId::from(7), id);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::new(12).to_string(), "#12");
    }
}
