use certchain_crypto::HasherError;
use certchain_types::BlockHash;

/// Errors produced by ledger operations.
///
/// `Validation`, `EmptyCollector` and `TailMismatch` are recoverable and
/// leave the ledger untouched. A search miss is not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("missing mandatory field(s): {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("nothing to seal: no pending records")]
    EmptyCollector,

    #[error("previous hash {expected} does not match current tail {actual}")]
    TailMismatch {
        expected: BlockHash,
        actual: BlockHash,
    },

    #[error("integrity violation at block {index}: {reason}")]
    IntegrityViolation { index: u64, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<HasherError> for LedgerError {
    fn from(err: HasherError) -> Self {
        match err {
            HasherError::Serialization(msg) => Self::Serialization(msg),
        }
    }
}
