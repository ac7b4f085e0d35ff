use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use certchain_crypto::{ChainError, HashChainVerifier};
use certchain_types::{BlockHash, Record, Timestamp};

use crate::block::Block;
use crate::collector::Collector;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::query::{Query, SearchHit};
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger owned by a single session.
///
/// Each instance is independent: create one per session, never share a
/// process-wide singleton. The internal lock makes every seal atomic, so an
/// instance may also be shared between request handlers behind an `Arc`.
pub struct InMemoryLedger {
    config: LedgerConfig,
    inner: RwLock<LedgerState>,
}

struct LedgerState {
    chain: Vec<Block>,
    collector: Collector,
}

impl InMemoryLedger {
    /// Create a ledger holding only a freshly sealed genesis block.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let genesis = Block::genesis(Timestamp::now())?;
        debug!(hash = %genesis.hash().short_hex(), "created genesis block");
        Ok(Self::from_parts(config, vec![genesis]))
    }

    /// Rebuild a ledger from previously exported blocks.
    ///
    /// Every block is re-hashed and every link checked; the pending
    /// collector starts empty.
    pub fn restore(config: LedgerConfig, blocks: Vec<Block>) -> Result<Self, LedgerError> {
        config.validate()?;

        let Some(genesis) = blocks.first() else {
            return Err(LedgerError::IntegrityViolation {
                index: 0,
                reason: "no genesis block".into(),
            });
        };
        if !genesis.records().is_empty() {
            return Err(LedgerError::IntegrityViolation {
                index: 1,
                reason: "genesis block carries records".into(),
            });
        }

        for (position, block) in blocks.iter().enumerate() {
            let expected = position as u64 + 1;
            if block.index() != expected {
                return Err(LedgerError::IntegrityViolation {
                    index: block.index(),
                    reason: format!("expected index {expected}, found {}", block.index()),
                });
            }
            if position > 0 && block.timestamp() < blocks[position - 1].timestamp() {
                return Err(LedgerError::IntegrityViolation {
                    index: expected,
                    reason: "timestamp precedes previous block".into(),
                });
            }
        }

        HashChainVerifier::verify_chain(&blocks).map_err(|err| match err {
            ChainError::Hasher(e) => e.into(),
            other => LedgerError::IntegrityViolation {
                index: other.index().unwrap_or(0) as u64 + 1,
                reason: other.to_string(),
            },
        })?;

        info!(blocks = blocks.len(), "restored ledger from exported blocks");
        Ok(Self::from_parts(config, blocks))
    }

    fn from_parts(config: LedgerConfig, chain: Vec<Block>) -> Self {
        let collector = Collector::new(config.required_fields.clone());
        Self {
            config,
            inner: RwLock::new(LedgerState { chain, collector }),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::IntegrityViolation {
                index: 0,
                reason: "ledger read lock poisoned".into(),
            })
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::IntegrityViolation {
                index: 0,
                reason: "ledger write lock poisoned".into(),
            })
    }

    fn tail(state: &LedgerState) -> Result<&Block, LedgerError> {
        state
            .chain
            .last()
            .ok_or_else(|| LedgerError::IntegrityViolation {
                index: 0,
                reason: "ledger has no genesis block".into(),
            })
    }

    fn append_block(state: &mut LedgerState, records: Vec<Record>) -> Result<Block, LedgerError> {
        let tail = Self::tail(state)?;
        let block = Block::seal(
            tail.index() + 1,
            Timestamp::now_after(tail.timestamp()),
            records,
            tail.hash(),
        )?;
        state.chain.push(block.clone());

        info!(
            index = block.index(),
            records = block.records().len(),
            hash = %block.hash().short_hex(),
            "sealed block"
        );
        Ok(block)
    }

    fn seal_pending(state: &mut LedgerState) -> Result<Block, LedgerError> {
        if state.collector.is_empty() {
            warn!("seal requested with no pending records");
            return Err(LedgerError::EmptyCollector);
        }

        // Drain only once the block is in the chain, so a failed seal keeps
        // the pending records.
        let records = state.collector.records().to_vec();
        let block = Self::append_block(state, records)?;
        state.collector.drain();
        Ok(block)
    }

    fn hits<'a>(
        &'a self,
        state: &'a LedgerState,
        query: &'a Query,
    ) -> impl Iterator<Item = SearchHit> + 'a {
        state
            .chain
            .iter()
            .flat_map(|block| block.records().iter().map(move |record| (record, block)))
            .filter(move |(record, _)| query.matches(record, &self.config))
            .map(|(record, block)| SearchHit {
                record: record.clone(),
                block: block.clone(),
            })
    }
}

impl LedgerWriter for InMemoryLedger {
    fn add_record(&self, record: Record) -> Result<Record, LedgerError> {
        let mut state = self.write_state()?;
        match state.collector.push(record) {
            Ok(stored) => {
                debug!(pending = state.collector.len(), "record collected");
                Ok(stored)
            }
            Err(err) => {
                warn!(%err, "record rejected");
                Err(err)
            }
        }
    }

    fn seal(&self) -> Result<Block, LedgerError> {
        let mut state = self.write_state()?;
        Self::seal_pending(&mut state)
    }

    fn seal_after(&self, previous_hash: BlockHash) -> Result<Block, LedgerError> {
        let mut state = self.write_state()?;
        let actual = Self::tail(&state)?.hash();
        if actual != previous_hash {
            warn!(expected = %previous_hash.short_hex(), actual = %actual.short_hex(), "stale seal");
            return Err(LedgerError::TailMismatch {
                expected: previous_hash,
                actual,
            });
        }
        Self::seal_pending(&mut state)
    }

    fn seal_record(&self, record: Record) -> Result<Block, LedgerError> {
        let mut state = self.write_state()?;
        if let Err(err) = state.collector.validate(&record) {
            warn!(%err, "record rejected");
            return Err(err);
        }
        Self::append_block(&mut state, vec![record])
    }
}

impl LedgerReader for InMemoryLedger {
    fn blocks(&self) -> Result<Vec<Block>, LedgerError> {
        Ok(self.read_state()?.chain.clone())
    }

    fn head(&self) -> Result<Block, LedgerError> {
        let state = self.read_state()?;
        Self::tail(&state).cloned()
    }

    fn block(&self, index: u64) -> Result<Option<Block>, LedgerError> {
        let state = self.read_state()?;
        let Some(position) = index.checked_sub(1) else {
            return Ok(None);
        };
        Ok(state.chain.get(position as usize).cloned())
    }

    fn block_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.chain.len() as u64)
    }

    fn pending(&self) -> Result<Vec<Record>, LedgerError> {
        Ok(self.read_state()?.collector.records().to_vec())
    }

    fn pending_count(&self) -> Result<usize, LedgerError> {
        Ok(self.read_state()?.collector.len())
    }

    fn find_by_identity(&self, query: &Query) -> Result<Option<SearchHit>, LedgerError> {
        let state = self.read_state()?;
        let hit = self.hits(&state, query).next();
        debug!(%query, found = hit.is_some(), "point lookup");
        Ok(hit)
    }

    fn find_all(&self, query: &Query) -> Result<Vec<SearchHit>, LedgerError> {
        let state = self.read_state()?;
        let hits: Vec<_> = self.hits(&state, query).collect();
        debug!(%query, matches = hits.len(), "multi-match lookup");
        Ok(hits)
    }
}
