//! Data model for Aqua Tree documents.
//!
//! The types here mirror the external Aqua Tree JSON format byte-for-byte at
//! the field-name level (`previous_verification_hash`, `revision_type`,
//! `local_timestamp`, `file_index`, `linkedChains`). The format is produced
//! by external tooling; this crate only reads it, so unknown fields are
//! preserved losslessly rather than rejected.
//!
//! # Sub-modules
//!
//! - [`revision`]: one node in a hash chain. ([`Revision`], [`RevisionType`])
//! - [`tree`]: a whole chain plus its file index. ([`AquaTree`],
//!   [`ChainDocument`])
//! - [`timestamp`]: the compact `YYYYMMDDHHmmss` timestamp encoding.

pub mod revision;
pub mod timestamp;
pub mod tree;

pub use revision::{Revision, RevisionType};
pub use timestamp::{TimestampError, format_human, parse_local_timestamp};
pub use tree::{AquaTree, ChainDocument};
