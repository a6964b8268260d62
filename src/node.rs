//! Nodes stored in a tree's arena

use crate::hash::MerkleHash;
use std::fmt;

/// Handle of a node inside the arena of the tree that built it.
///
/// Ids are assigned in creation order: leaves first, left to right, then the
/// nodes of each folded level. They are only meaningful for the tree that
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered children of an internal node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Children {
    pub left: NodeId,
    /// Absent when the left child was promoted without a sibling
    pub right: Option<NodeId>,
}

impl Children {
    /// Iterate over the present children, left first
    pub fn iter(&self) -> impl Iterator<Item = NodeId> {
        std::iter::once(self.left).chain(self.right)
    }
}

/// A single leaf or internal node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleNode {
    pub(crate) id: NodeId,
    pub(crate) digest: MerkleHash,
    pub(crate) level: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Option<Children>,
}

impl MerkleNode {
    pub(crate) fn leaf(id: NodeId, digest: MerkleHash) -> Self {
        Self {
            id,
            digest,
            level: 0,
            parent: None,
            children: None,
        }
    }

    pub(crate) fn internal(
        id: NodeId,
        digest: MerkleHash,
        level: usize,
        children: Children,
    ) -> Self {
        Self {
            id,
            digest,
            level,
            parent: None,
            children: Some(children),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Commitment held by this node
    pub fn digest(&self) -> &MerkleHash {
        &self.digest
    }

    /// Distance from the leaf row, leaves are level 0
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<&Children> {
        self.children.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// True for an internal node carrying a single child
    pub fn is_promoted(&self) -> bool {
        matches!(self.children, Some(Children { right: None, .. }))
    }
}
