//! Append-only certificate ledger for certchain.
//!
//! This crate is the heart of certchain. It provides:
//! - `Block` with a commitment hash linked to its predecessor
//! - `Collector` holding validated records that are not yet sealed
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `InMemoryLedger`, one independent instance per session
//! - Case-insensitive linear search in three named query modes
//! - Projection builders (record listing, chain summary)
//!
//! "Mining" a block in the front ends is sealing here: the hash is a
//! commitment over the block content, with no nonce or difficulty target.

pub mod block;
pub mod collector;
pub mod config;
pub mod error;
pub mod memory;
pub mod projection;
pub mod query;
pub mod traits;

pub use block::Block;
pub use collector::Collector;
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use projection::{ChainSummary, ProjectionBuilder, RecordListing};
pub use query::{Query, QueryMode, SearchHit};
pub use traits::{LedgerReader, LedgerWriter};
