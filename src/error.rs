//! Merkle Tree Errors

use displaydoc::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Error {
    /// Cannot build a merkle tree from an empty record list
    EmptyInput,
    /// Hash function failed: {0}
    Hashing(String),
    /// Requested index: {0} exceeds number of nodes or leaves: {1}
    ExceededMaxIndex(usize, usize),
    /// Invalid hex digest: {0}
    InvalidHex(String),
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::EmptyInput.to_string(),
            "Cannot build a merkle tree from an empty record list"
        );
        assert_eq!(
            Error::ExceededMaxIndex(12, 9).to_string(),
            "Requested index: 12 exceeds number of nodes or leaves: 9"
        );
        assert_eq!(
            Error::Hashing("device unavailable".into()).to_string(),
            "Hash function failed: device unavailable"
        );
    }
}
