//! Foundation types for certchain.
//!
//! Every other certchain crate depends on `certchain-types`.
//!
//! # Key Types
//!
//! - [`Record`] — Open, key-ordered mapping of named fields plus an optional identifier
//! - [`RecordId`] — Caller-supplied or generated (UUID v7) record identifier
//! - [`BlockHash`] — 32-byte commitment digest, hex on the wire
//! - [`Timestamp`] — Wall-clock milliseconds used for block creation time

pub mod error;
pub mod fields;
pub mod hash;
pub mod record;
pub mod temporal;

pub use error::TypeError;
pub use hash::BlockHash;
pub use record::{Record, RecordId};
pub use temporal::Timestamp;
