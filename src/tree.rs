//! Merkle Tree construction by level folding.

use crate::{
    config::{BuildConfig, ChildEncoding, OddNodePolicy},
    error::Error,
    hash::{DigestProvider, MerkleHash},
    node::{Children, MerkleNode, NodeId},
};
use std::{fmt, marker::PhantomData};
use tracing::{debug, trace};

/// Builds [`MerkleTree`]s from ordered records using the hash function `HF`
pub struct MerkleTreeBuilder<HF: DigestProvider> {
    _hasher: PhantomData<HF>,
    config: BuildConfig,
}

impl<HF: DigestProvider> Clone for MerkleTreeBuilder<HF> {
    fn clone(&self) -> Self {
        Self::with_config(self.config)
    }
}

impl<HF: DigestProvider> fmt::Debug for MerkleTreeBuilder<HF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTreeBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl<HF: DigestProvider> Default for MerkleTreeBuilder<HF> {
    fn default() -> Self {
        Self::with_config(BuildConfig::default())
    }
}

impl<HF: DigestProvider> MerkleTreeBuilder<HF> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BuildConfig) -> Self {
        Self {
            _hasher: PhantomData,
            config,
        }
    }

    /// Set how nodes without a sibling are carried up a level
    pub fn odd_node(mut self, policy: OddNodePolicy) -> Self {
        self.config.odd_node = policy;
        self
    }

    /// Set the byte form of child digests fed to the pair hash
    pub fn child_encoding(mut self, encoding: ChildEncoding) -> Self {
        self.config.child_encoding = encoding;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Hash every record into a leaf and fold the leaf row into a tree.
    ///
    /// Fails with [`Error::EmptyInput`] when `records` is empty and with
    /// [`Error::Hashing`] when the hash function fails. Nothing of the
    /// partially built tree survives a failure.
    pub fn build<R: AsRef<[u8]>>(&self, records: &[R]) -> Result<MerkleTree<HF>, Error> {
        if records.is_empty() {
            return Err(Error::EmptyInput);
        }
        let leaves = records
            .iter()
            .map(|record| HF::hash_bytes(record.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.fold(leaves)
    }

    /// Same as [`build`](Self::build), hashing the leaf row on the rayon
    /// thread pool. Folding stays sequential.
    #[cfg(feature = "parallel")]
    pub fn build_parallel<R: AsRef<[u8]> + Sync>(
        &self,
        records: &[R],
    ) -> Result<MerkleTree<HF>, Error> {
        use rayon::prelude::*;

        if records.is_empty() {
            return Err(Error::EmptyInput);
        }
        let leaves = records
            .par_iter()
            .map(|record| HF::hash_bytes(record.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.fold(leaves)
    }

    fn fold(&self, leaves: Vec<MerkleHash>) -> Result<MerkleTree<HF>, Error> {
        let leaf_count = leaves.len();
        // ceil(log2(n)), zero for a single leaf
        let levels = leaf_count.next_power_of_two().trailing_zeros() as usize;
        let width = 1usize << levels;
        debug!(
            target: "merkle::builder",
            leaf_count,
            width,
            height = levels + 1,
            odd_node = ?self.config.odd_node,
            "building merkle tree"
        );

        let mut nodes = Vec::with_capacity(2 * width - 1);
        let mut row: Vec<Option<NodeId>> = Vec::with_capacity(width);
        for digest in leaves {
            let id = NodeId(nodes.len());
            nodes.push(MerkleNode::leaf(id, digest));
            row.push(Some(id));
        }
        // Padding slots stay absent, they are never hashed
        row.resize(width, None);

        for level in 1..=levels {
            let mut next_row = Vec::with_capacity(row.len() / 2);
            for pair in row.chunks_exact(2) {
                let slot = match (pair[0], pair[1]) {
                    (Some(left), Some(right)) => {
                        let digest =
                            self.combine(&nodes[left.0].digest, &nodes[right.0].digest)?;
                        let children = Children {
                            left,
                            right: Some(right),
                        };
                        Some(attach(&mut nodes, level, digest, children))
                    }
                    (Some(left), None) => {
                        let digest = self.promote(&nodes[left.0].digest)?;
                        let children = Children { left, right: None };
                        Some(attach(&mut nodes, level, digest, children))
                    }
                    (None, _) => None,
                };
                next_row.push(slot);
            }
            trace!(
                target: "merkle::builder",
                level,
                nodes = next_row.iter().flatten().count(),
                slots = next_row.len(),
                "folded level"
            );
            row = next_row;
        }

        let root = row.into_iter().next().flatten().ok_or(Error::EmptyInput)?;
        debug!(
            target: "merkle::builder",
            root = %nodes[root.0].digest,
            nodes = nodes.len(),
            "built merkle tree"
        );

        Ok(MerkleTree {
            _hasher: PhantomData,
            nodes,
            root,
            height: levels + 1,
            leaf_count,
            config: self.config,
        })
    }

    fn combine(&self, left: &MerkleHash, right: &MerkleHash) -> Result<MerkleHash, Error> {
        let encoding = self.config.child_encoding;
        HF::hash_pair(&encoding.encode(left), &encoding.encode(right))
    }

    fn promote(&self, digest: &MerkleHash) -> Result<MerkleHash, Error> {
        match self.config.odd_node {
            OddNodePolicy::PassThrough => Ok(*digest),
            OddNodePolicy::Duplicate => self.combine(digest, digest),
        }
    }
}

/// Push a new internal node and point its children back at it
fn attach(
    nodes: &mut Vec<MerkleNode>,
    level: usize,
    digest: MerkleHash,
    children: Children,
) -> NodeId {
    let id = NodeId(nodes.len());
    for child in children.iter() {
        debug_assert!(nodes[child.0].parent.is_none(), "node {child} folded twice");
        nodes[child.0].parent = Some(id);
    }
    nodes.push(MerkleNode::internal(id, digest, level, children));
    id
}

/// Merkle Tree data structure
///
/// Every node lives in a single arena indexed by [`NodeId`]. The tree is
/// immutable once built.
pub struct MerkleTree<HF: DigestProvider> {
    _hasher: PhantomData<HF>,
    pub(crate) nodes: Vec<MerkleNode>,
    root: NodeId,
    height: usize,
    leaf_count: usize,
    config: BuildConfig,
}

impl<HF: DigestProvider> MerkleTree<HF> {
    /// Build a tree with the default settings
    pub fn build<R: AsRef<[u8]>>(records: &[R]) -> Result<Self, Error> {
        MerkleTreeBuilder::<HF>::new().build(records)
    }

    /// Get the root node of the tree
    pub fn root(&self) -> &MerkleNode {
        &self.nodes[self.root.0]
    }

    /// Get the merkle root of the tree
    pub fn root_hash(&self) -> &MerkleHash {
        &self.root().digest
    }

    /// Number of levels from the leaves to the root, both included
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of real nodes across all levels
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &MerkleNode> {
        self.nodes.iter()
    }

    /// The leaf row, in record order
    pub fn leaves(&self) -> impl Iterator<Item = &MerkleNode> {
        self.nodes[..self.leaf_count].iter()
    }

    /// Real nodes of one level, left to right
    pub fn level(&self, level: usize) -> impl Iterator<Item = &MerkleNode> {
        self.nodes.iter().filter(move |node| node.level == level)
    }

    /// Get a node by id
    pub fn get_node(&self, id: NodeId) -> Result<&MerkleNode, Error> {
        self.nodes
            .get(id.0)
            .ok_or(Error::ExceededMaxIndex(id.0, self.nodes.len()))
    }

    /// Get a node's parent, `None` for the root
    pub fn parent(&self, id: NodeId) -> Result<Option<&MerkleNode>, Error> {
        let node = self.get_node(id)?;
        Ok(node.parent.map(|parent| &self.nodes[parent.0]))
    }

    /// Get a node's children, left first; empty for leaves
    pub fn children(&self, id: NodeId) -> Result<Vec<&MerkleNode>, Error> {
        let node = self.get_node(id)?;
        Ok(node
            .children
            .iter()
            .flat_map(Children::iter)
            .map(|child| &self.nodes[child.0])
            .collect())
    }

    /// Walk from a node up to the root, starting with the node itself
    pub fn path_to_root(
        &self,
        id: NodeId,
    ) -> Result<impl Iterator<Item = &MerkleNode>, Error> {
        let start = self.get_node(id)?;
        Ok(std::iter::successors(Some(start), move |node| {
            node.parent.map(|parent| &self.nodes[parent.0])
        }))
    }
}

impl<HF: DigestProvider> fmt::Debug for MerkleTree<HF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("root", self.root_hash())
            .field("height", &self.height)
            .field("leaf_count", &self.leaf_count)
            .field("nodes", &self.nodes)
            .field("config", &self.config)
            .finish()
    }
}
