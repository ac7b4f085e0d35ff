use serde::Serialize;

use certchain_types::{BlockHash, Record, Timestamp};

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// One sealed record flattened with the metadata of its block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordListing {
    pub block_index: u64,
    pub timestamp: Timestamp,
    pub block_hash: BlockHash,
    pub record: Record,
}

/// Counts and head position of a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    pub block_count: u64,
    pub record_count: usize,
    pub pending_count: usize,
    pub head_index: u64,
    pub head_hash: BlockHash,
}

/// Deterministic projection builders.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    /// Every sealed record in chain order, one row each.
    pub fn record_listing<R: LedgerReader>(reader: &R) -> Result<Vec<RecordListing>, LedgerError> {
        let blocks = reader.blocks()?;
        Ok(blocks
            .iter()
            .flat_map(|block| {
                block.records().iter().map(move |record| RecordListing {
                    block_index: block.index(),
                    timestamp: block.timestamp(),
                    block_hash: block.hash(),
                    record: record.clone(),
                })
            })
            .collect())
    }

    /// Chain counts and head taken from one snapshot of the blocks.
    pub fn summary<R: LedgerReader>(reader: &R) -> Result<ChainSummary, LedgerError> {
        let blocks = reader.blocks()?;
        let head = blocks.last().ok_or_else(|| LedgerError::IntegrityViolation {
            index: 0,
            reason: "chain has no genesis block".into(),
        })?;
        Ok(ChainSummary {
            block_count: blocks.len() as u64,
            record_count: blocks.iter().map(|b| b.records().len()).sum(),
            pending_count: reader.pending_count()?,
            head_index: head.index(),
            head_hash: head.hash(),
        })
    }
}

#[cfg(test)]
mod tests {
    use certchain_types::{BlockHash, Record};

    use crate::block::Block;
    use crate::config::LedgerConfig;
    use crate::memory::InMemoryLedger;
    use crate::query::{Query, SearchHit};
    use crate::traits::LedgerWriter;

    /// Reader whose `head` lags one block behind its `blocks`, as a
    /// concurrent seal between two reads would leave it.
    struct LaggingReader {
        inner: InMemoryLedger,
        stale_head: Block,
    }

    impl LedgerReader for LaggingReader {
        fn blocks(&self) -> Result<Vec<Block>, LedgerError> {
            self.inner.blocks()
        }
        fn head(&self) -> Result<Block, LedgerError> {
            Ok(self.stale_head.clone())
        }
        fn block(&self, index: u64) -> Result<Option<Block>, LedgerError> {
            self.inner.block(index)
        }
        fn block_count(&self) -> Result<u64, LedgerError> {
            self.inner.block_count()
        }
        fn pending(&self) -> Result<Vec<Record>, LedgerError> {
            self.inner.pending()
        }
        fn pending_count(&self) -> Result<usize, LedgerError> {
            self.inner.pending_count()
        }
        fn find_by_identity(&self, query: &Query) -> Result<Option<SearchHit>, LedgerError> {
            self.inner.find_by_identity(query)
        }
        fn find_all(&self, query: &Query) -> Result<Vec<SearchHit>, LedgerError> {
            self.inner.find_all(query)
        }
    }

    use super::*;

    #[test]
    fn listing_flattens_in_chain_order() {
        let ledger = InMemoryLedger::new(LedgerConfig::default()).unwrap();
        ledger.add_record(Record::certificate("Ana", "Physics")).unwrap();
        ledger.add_record(Record::certificate("Ben", "Chemistry")).unwrap();
        let first = ledger.seal().unwrap();
        let second = ledger
            .seal_record(Record::certificate("Cleo", "Biology"))
            .unwrap();

        let rows = ProjectionBuilder::record_listing(&ledger).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].block_index, 2);
        assert_eq!(rows[1].block_hash, first.hash());
        assert_eq!(rows[2].block_index, 3);
        assert_eq!(rows[2].timestamp, second.timestamp());
        assert_eq!(rows[2].record.get("student"), Some("Cleo"));
    }

    #[test]
    fn summary_counts_sealed_and_pending() {
        let ledger = InMemoryLedger::new(LedgerConfig::default()).unwrap();
        let fresh = ProjectionBuilder::summary(&ledger).unwrap();
        assert_eq!(fresh.block_count, 1);
        assert_eq!(fresh.record_count, 0);
        assert_eq!(fresh.head_index, 1);

        ledger.add_record(Record::certificate("Ana", "Physics")).unwrap();
        let sealed = ledger.seal().unwrap();
        ledger.add_record(Record::certificate("Ben", "Chemistry")).unwrap();

        let summary = ProjectionBuilder::summary(&ledger).unwrap();
        assert_eq!(summary.block_count, 2);
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.head_hash, sealed.hash());
    }

    #[test]
    fn summary_head_agrees_with_block_count() {
        let inner = InMemoryLedger::new(LedgerConfig::default()).unwrap();
        let stale_head = inner.head().unwrap();
        let sealed = inner
            .seal_record(Record::certificate("Ana", "Physics"))
            .unwrap();
        let reader = LaggingReader { inner, stale_head };

        let summary = ProjectionBuilder::summary(&reader).unwrap();
        assert_eq!(summary.block_count, 2);
        assert_eq!(summary.head_index, summary.block_count);
        assert_eq!(summary.head_hash, sealed.hash());
        assert_ne!(summary.head_hash, BlockHash::SENTINEL);
    }
}
