use serde::{Deserialize, Serialize};

use certchain_crypto::{ChainLinked, ContentHasher, HasherError};
use certchain_types::{BlockHash, Record, Timestamp};

/// A sealed, immutable batch of records.
///
/// The hash is computed once, when the block is sealed, over the canonical
/// encoding of every other field. Blocks expose read-only accessors so the
/// only way to obtain one is to seal it or to deserialize an export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: Timestamp,
    records: Vec<Record>,
    previous_hash: BlockHash,
    hash: BlockHash,
}

/// Hash input for a block. Keys are declared in lexicographic order and
/// `hash` is absent, so the encoding is canonical and never self-referential.
#[derive(Serialize)]
struct CanonicalBlock<'a> {
    index: u64,
    previous_hash: &'a BlockHash,
    records: &'a [Record],
    timestamp: Timestamp,
}

impl Block {
    /// Build the genesis block: index 1, no records, sentinel previous hash.
    pub fn genesis(timestamp: Timestamp) -> Result<Self, HasherError> {
        Self::seal(1, timestamp, Vec::new(), BlockHash::SENTINEL)
    }

    /// Build a block and compute its commitment hash.
    pub fn seal(
        index: u64,
        timestamp: Timestamp,
        records: Vec<Record>,
        previous_hash: BlockHash,
    ) -> Result<Self, HasherError> {
        let hash = commitment(index, timestamp, &records, &previous_hash)?;
        Ok(Self {
            index,
            timestamp,
            records,
            previous_hash,
            hash,
        })
    }

    /// 1-based position in the chain.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn previous_hash(&self) -> BlockHash {
        self.previous_hash
    }

    pub fn hash(&self) -> BlockHash {
        self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1 && self.previous_hash.is_sentinel()
    }

    /// Re-derive the commitment hash from the current content.
    pub fn recompute_hash(&self) -> Result<BlockHash, HasherError> {
        commitment(self.index, self.timestamp, &self.records, &self.previous_hash)
    }

    /// Returns `true` if the stored hash still matches the content.
    pub fn is_intact(&self) -> bool {
        self.recompute_hash().is_ok_and(|h| h == self.hash)
    }
}

impl ChainLinked for Block {
    fn block_hash(&self) -> BlockHash {
        self.hash
    }

    fn previous_hash(&self) -> BlockHash {
        self.previous_hash
    }

    fn recompute_hash(&self) -> Result<BlockHash, HasherError> {
        Block::recompute_hash(self)
    }
}

fn commitment(
    index: u64,
    timestamp: Timestamp,
    records: &[Record],
    previous_hash: &BlockHash,
) -> Result<BlockHash, HasherError> {
    ContentHasher::BLOCK.hash_json(&CanonicalBlock {
        index,
        previous_hash,
        records,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use certchain_types::RecordId;

    fn block_with(records: Vec<Record>) -> Block {
        Block::seal(
            2,
            Timestamp::from_millis(1_700_000_000_000),
            records,
            BlockHash::from_hash([4; 32]),
        )
        .unwrap()
    }

    #[test]
    fn genesis_shape() {
        let genesis = Block::genesis(Timestamp::from_millis(1)).unwrap();
        assert_eq!(genesis.index(), 1);
        assert!(genesis.records().is_empty());
        assert!(genesis.previous_hash().is_sentinel());
        assert!(genesis.is_genesis());
        assert!(genesis.is_intact());
    }

    #[test]
    fn hash_is_deterministic() {
        let a = block_with(vec![Record::certificate("Ana", "Physics")]);
        let b = block_with(vec![Record::certificate("Ana", "Physics")]);
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.recompute_hash().unwrap(), a.hash());
    }

    #[test]
    fn field_insertion_order_does_not_matter() {
        let forward = Record::new()
            .with_field("student", "Ana")
            .with_field("course", "Physics")
            .with_field("remarks", "honours");
        let backward = Record::new()
            .with_field("remarks", "honours")
            .with_field("course", "Physics")
            .with_field("student", "Ana");
        assert_eq!(block_with(vec![forward]).hash(), block_with(vec![backward]).hash());
    }

    #[test]
    fn every_field_feeds_the_hash() {
        let base = block_with(vec![Record::certificate("Ana", "Physics")]);
        let records = vec![Record::certificate("Ana", "Physics")];

        let other_index =
            Block::seal(3, base.timestamp(), records.clone(), base.previous_hash()).unwrap();
        let other_time = Block::seal(
            2,
            Timestamp::from_millis(1_700_000_000_001),
            records.clone(),
            base.previous_hash(),
        )
        .unwrap();
        let other_prev =
            Block::seal(2, base.timestamp(), records, BlockHash::from_hash([5; 32])).unwrap();
        let other_record = block_with(vec![Record::certificate("Anb", "Physics")]);
        let with_id = block_with(vec![
            Record::certificate("Ana", "Physics").with_id(RecordId::new("C-1"))
        ]);

        for changed in [other_index, other_time, other_prev, other_record, with_id] {
            assert_ne!(changed.hash(), base.hash());
        }
    }

    #[test]
    fn record_order_within_block_matters() {
        let a = Record::certificate("Ana", "Physics");
        let b = Record::certificate("Ben", "Chemistry");
        assert_ne!(
            block_with(vec![a.clone(), b.clone()]).hash(),
            block_with(vec![b, a]).hash()
        );
    }

    #[test]
    fn stored_hash_is_excluded_from_input() {
        let mut block = block_with(vec![Record::certificate("Ana", "Physics")]);
        let original = block.recompute_hash().unwrap();
        block.hash = BlockHash::from_hash([0xff; 32]);
        assert_eq!(block.recompute_hash().unwrap(), original);
        assert!(!block.is_intact());
    }

    #[test]
    fn tampered_record_is_detected() {
        let mut block = block_with(vec![Record::certificate("Ana", "Physics")]);
        block.records[0].insert("course", "Physicz");
        assert!(!block.is_intact());
    }

    #[test]
    fn export_roundtrip_stays_intact() {
        let block = block_with(vec![Record::certificate("Ana", "Physics")]);
        let json = serde_json::to_string(&block).unwrap();
        let parsed: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, block);
        assert!(parsed.is_intact());
    }
}
