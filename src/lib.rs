//! Deterministic Merkle tree construction
//!
//! Records are hashed into leaves, the leaf row is padded with absent slots
//! up to the next power of two and folded level by level until a single root
//! remains. A node without a sibling is promoted with its digest unchanged
//! unless [`OddNodePolicy::Duplicate`] is selected.
//!
//! ```
//! use merkle_builder::{MerkleTree, Sha256};
//!
//! let tree = MerkleTree::<Sha256>::build(&["a", "b", "c"]).unwrap();
//! assert_eq!(tree.height(), 3);
//! println!("root: {}", tree.root_hash());
//! ```

mod config;
mod error;
mod hash;
mod node;
mod tree;

pub use crate::{
    config::{BuildConfig, ChildEncoding, OddNodePolicy},
    error::Error,
    hash::{Blake2s256, DigestProvider, MerkleHash, Sha256, Sha3_256, DIGEST_LEN},
    node::{Children, MerkleNode, NodeId},
    tree::{MerkleTree, MerkleTreeBuilder},
};

#[cfg(test)]
mod test_utils {
    use super::*;

    /// Records of the reference ledger run
    pub(crate) const REFERENCE_RECORDS: [&str; 9] = [
        "a gives to b",
        "b gives to c",
        "c gives to a",
        "a gives to e",
        "e gives to f",
        "f gives to d",
        "d gives to a",
        "a gives to b",
        "b gives to f",
    ];

    pub(crate) fn hash_record<HF: DigestProvider>(record: &str) -> MerkleHash {
        HF::hash_bytes(record.as_bytes()).unwrap()
    }

    pub(crate) fn hash_pair<HF: DigestProvider>(left: &[u8], right: &[u8]) -> MerkleHash {
        HF::hash_pair(left, right).unwrap()
    }
}
