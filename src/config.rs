//! Tree construction settings

use crate::hash::MerkleHash;
use std::borrow::Cow;

/// What to do with a node that has no sibling at its level
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OddNodePolicy {
    /// Promote the node's digest one level up without re-hashing
    #[default]
    PassThrough,
    /// Hash the node's digest with itself, the Bitcoin-style convention
    Duplicate,
}

/// Byte form of a child digest when two children are concatenated
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChildEncoding {
    /// The raw 32 digest bytes
    #[default]
    Raw,
    /// The 64 byte lowercase hex text of the digest
    LowerHex,
}

impl ChildEncoding {
    pub(crate) fn encode<'a>(&self, digest: &'a MerkleHash) -> Cow<'a, [u8]> {
        match self {
            ChildEncoding::Raw => Cow::Borrowed(&digest.0[..]),
            ChildEncoding::LowerHex => Cow::Owned(digest.to_hex().into_bytes()),
        }
    }
}

/// Settings applied to a single tree build
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    pub odd_node: OddNodePolicy,
    pub child_encoding: ChildEncoding,
}

impl BuildConfig {
    /// Pass-through promotion with hex-text child concatenation. Combined
    /// with [`Sha256`](crate::Sha256) this yields the same digests as the
    /// string-based reference tool.
    pub fn reference() -> Self {
        Self {
            odd_node: OddNodePolicy::PassThrough,
            child_encoding: ChildEncoding::LowerHex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_encoding() {
        let digest = MerkleHash([0xab; 32]);
        assert_eq!(ChildEncoding::Raw.encode(&digest).as_ref(), &[0xab; 32]);

        let text = ChildEncoding::LowerHex.encode(&digest);
        assert_eq!(text.len(), 64);
        assert_eq!(text.as_ref(), "ab".repeat(32).as_bytes());
    }

    #[test]
    fn test_defaults() {
        let config = BuildConfig::default();
        assert_eq!(config.odd_node, OddNodePolicy::PassThrough);
        assert_eq!(config.child_encoding, ChildEncoding::Raw);
        assert_eq!(
            BuildConfig::reference().child_encoding,
            ChildEncoding::LowerHex
        );
    }
}
