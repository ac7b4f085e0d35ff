use certchain_types::BlockHash;

use crate::hasher::HasherError;

/// Trait for values that participate in a hash chain.
pub trait ChainLinked {
    /// The stored commitment hash.
    fn block_hash(&self) -> BlockHash;
    /// The predecessor's hash ([`BlockHash::SENTINEL`] for genesis).
    fn previous_hash(&self) -> BlockHash;
    /// Re-derive the commitment hash from the value's content.
    fn recompute_hash(&self) -> Result<BlockHash, HasherError>;
}

/// Hash chain integrity verifier.
///
/// Verifies that a sequence forms a valid hash chain: the first element
/// points at the sentinel, each later element's previous hash matches its
/// predecessor's hash, and every stored hash matches its content.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain, reporting the first violation found.
    pub fn verify_chain(chain: &[impl ChainLinked]) -> Result<(), ChainError> {
        let Some(genesis) = chain.first() else {
            return Ok(());
        };

        if !genesis.previous_hash().is_sentinel() {
            return Err(ChainError::GenesisNotSentinel);
        }

        for (index, item) in chain.iter().enumerate() {
            if index > 0 && item.previous_hash() != chain[index - 1].block_hash() {
                return Err(ChainError::BrokenLink { index });
            }
            if item.recompute_hash()? != item.block_hash() {
                return Err(ChainError::HashMismatch { index });
            }
        }

        Ok(())
    }
}

/// Errors from chain verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("genesis block does not carry the sentinel previous hash")]
    GenesisNotSentinel,

    #[error("broken link at index {index}: previous hash does not match")]
    BrokenLink { index: usize },

    #[error("hash mismatch at index {index}: computed hash differs from stored")]
    HashMismatch { index: usize },

    #[error(transparent)]
    Hasher(#[from] HasherError),
}

impl ChainError {
    /// Zero-based position of the offending element, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::GenesisNotSentinel => Some(0),
            Self::BrokenLink { index } | Self::HashMismatch { index } => Some(*index),
            Self::Hasher(_) => None,
        }
    }
}
