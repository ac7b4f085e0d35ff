//! Cryptographic primitives for certchain.
//!
//! Provides domain-separated BLAKE3 hashing and hash chain verification.
//! There is no signing and no proof-of-work: a block hash is a plain
//! commitment over the block's canonical content.

pub mod chain;
pub mod hasher;

pub use chain::{ChainError, ChainLinked, HashChainVerifier};
pub use hasher::{ContentHasher, HasherError};
