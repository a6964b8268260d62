//! Digest providers and the fixed-size Merkle hash value

use crate::error::Error;
use sha2::digest::{consts::U32, Digest};
use std::{fmt, ops::Deref};

pub use blake2::Blake2s256;
pub use sha2::Sha256;
pub use sha3::Sha3_256;

/// Length in bytes of every digest stored in the tree
pub const DIGEST_LEN: usize = 32;

/// Hash function capability consumed by the tree builder.
///
/// Any RustCrypto hasher with a 32 byte output is a provider through the
/// blanket implementation below and never fails. Providers backed by
/// something fallible (an HSM, a remote signer) implement this directly and
/// report failures as [`Error::Hashing`].
pub trait DigestProvider {
    /// Hash a raw byte string
    fn hash_bytes(data: &[u8]) -> Result<MerkleHash, Error>;

    /// Hash two nodes on a merkle tree by concatenating the left and
    /// right inputs, left first, and hashing the concatenated value.
    fn hash_pair(left: &[u8], right: &[u8]) -> Result<MerkleHash, Error> {
        Self::hash_bytes(&[left, right].concat())
    }
}

impl<D> DigestProvider for D
where
    D: Digest<OutputSize = U32>,
{
    fn hash_bytes(data: &[u8]) -> Result<MerkleHash, Error> {
        let mut result = [0u8; DIGEST_LEN];
        result.copy_from_slice(<D as Digest>::digest(data).as_slice());
        Ok(MerkleHash(result))
    }

    fn hash_pair(left: &[u8], right: &[u8]) -> Result<MerkleHash, Error> {
        let mut hasher = D::new();
        let mut result = [0u8; DIGEST_LEN];

        Digest::update(&mut hasher, left);
        Digest::update(&mut hasher, right);
        result.copy_from_slice(hasher.finalize().as_slice());
        Ok(MerkleHash(result))
    }
}

/// Container for Merkle Hashes
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MerkleHash(pub [u8; DIGEST_LEN]);

impl MerkleHash {
    /// Lowercase hex encoding of the digest
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a digest from 64 hex characters
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let mut result = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut result).map_err(|e| Error::InvalidHex(e.to_string()))?;
        Ok(MerkleHash(result))
    }

    /// Short prefix for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl Deref for MerkleHash {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for MerkleHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for MerkleHash {
    fn from(value: [u8; DIGEST_LEN]) -> Self {
        MerkleHash(value)
    }
}

impl PartialEq<[u8; DIGEST_LEN]> for MerkleHash {
    fn eq(&self, other: &[u8; DIGEST_LEN]) -> bool {
        &self.0 == other
    }
}

impl fmt::Display for MerkleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for MerkleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MerkleHash({})", self.short())
    }
}
