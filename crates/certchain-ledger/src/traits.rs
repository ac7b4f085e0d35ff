use certchain_types::{BlockHash, Record};

use crate::block::Block;
use crate::error::LedgerError;
use crate::query::{Query, SearchHit};

/// Write boundary for ledger mutations.
///
/// Implementations must make each seal atomic: reading the tail hash,
/// building the block, appending it and draining the collector happen
/// as one step with respect to other writers.
pub trait LedgerWriter: Send + Sync {
    /// Validate a record and add it to the pending collector.
    fn add_record(&self, record: Record) -> Result<Record, LedgerError>;

    /// Seal every pending record into a new block linked to the tail.
    fn seal(&self) -> Result<Block, LedgerError>;

    /// Like [`LedgerWriter::seal`], but only if the tail still has `previous_hash`.
    fn seal_after(&self, previous_hash: BlockHash) -> Result<Block, LedgerError>;

    /// Seal a single record into its own block, leaving the collector alone.
    fn seal_record(&self, record: Record) -> Result<Block, LedgerError>;
}

/// Read boundary for chain inspection and search.
pub trait LedgerReader: Send + Sync {
    fn blocks(&self) -> Result<Vec<Block>, LedgerError>;

    /// The most recently sealed block (genesis for a fresh ledger).
    fn head(&self) -> Result<Block, LedgerError>;

    /// Block at a 1-based index.
    fn block(&self, index: u64) -> Result<Option<Block>, LedgerError>;

    fn block_count(&self) -> Result<u64, LedgerError>;

    fn pending(&self) -> Result<Vec<Record>, LedgerError>;

    fn pending_count(&self) -> Result<usize, LedgerError>;

    /// First match, scanning blocks in order and records in order within a block.
    fn find_by_identity(&self, query: &Query) -> Result<Option<SearchHit>, LedgerError>;

    /// Every match, in the same order as [`LedgerReader::find_by_identity`].
    fn find_all(&self, query: &Query) -> Result<Vec<SearchHit>, LedgerError>;
}
