//! Revision records — the nodes of a hash chain.
//!
//! A [`Revision`] maps 1:1 to one entry of the `revisions` object in an Aqua
//! Tree JSON document. The three fields this crate cares about are modeled
//! explicitly; everything else (signature digests, witness receipts, form
//! payloads, ...) varies by [`RevisionType`] and is preserved verbatim in
//! `extra` so a round-trip through this crate is lossless.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::timestamp::{self, TimestampError};

// ---------------------------------------------------------------------------
// RevisionType
// ---------------------------------------------------------------------------

/// The revision type tag.
///
/// Determines rendering and payload semantics but never ordering. The five
/// named variants are the tags the Aqua protocol emits today; anything else
/// deserializes into [`RevisionType::Other`] so newer documents still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RevisionType {
    /// A file content revision (including the genesis of most chains).
    File,
    /// A form (structured key/value) revision.
    Form,
    /// A link revision attaching another chain to this one.
    Link,
    /// A cryptographic signature over the chain so far.
    Signature,
    /// A witness receipt anchoring the chain in an external ledger.
    Witness,
    /// A tag this crate does not know about, preserved verbatim.
    Other(String),
}

impl RevisionType {
    /// Return the wire-format tag string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::File => "file",
            Self::Form => "form",
            Self::Link => "link",
            Self::Signature => "signature",
            Self::Witness => "witness",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for RevisionType {
    fn from(s: &str) -> Self {
        match s {
            "file" => Self::File,
            "form" => Self::Form,
            "link" => Self::Link,
            "signature" => Self::Signature,
            "witness" => Self::Witness,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RevisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Custom serde: the tag is a bare string on the wire.
impl Serialize for RevisionType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RevisionType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Revision
// ---------------------------------------------------------------------------

/// One revision in an Aqua Tree chain.
///
/// Revisions are identified externally by their content hash (the key of the
/// `revisions` map, not a field of the record) and point backwards to their
/// predecessor via `previous_verification_hash`. The genesis revision carries
/// an empty string there.
///
/// # Serde
///
/// Field names are dictated by the external Aqua Tree format and must not be
/// renamed. Type-specific fields are kept in `extra` via `#[serde(flatten)]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Hash of the predecessor revision, or the empty string for genesis.
    #[serde(default)]
    pub previous_verification_hash: String,

    /// The revision type tag.
    pub revision_type: RevisionType,

    /// Creation time in the compact `YYYYMMDDHHmmss` encoding.
    #[serde(default)]
    pub local_timestamp: String,

    /// All remaining wire fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Revision {
    /// Create a revision with the given predecessor and type and no payload.
    ///
    /// Mostly useful for building chains in tests and benchmarks.
    #[must_use]
    pub fn new(previous_verification_hash: impl Into<String>, revision_type: RevisionType) -> Self {
        Self {
            previous_verification_hash: previous_verification_hash.into(),
            revision_type,
            local_timestamp: String::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Returns `true` if this revision claims to be a genesis (empty
    /// predecessor pointer).
    ///
    /// Note that a revision whose predecessor simply is not part of the
    /// containing chain also qualifies as a genesis *candidate*; that check
    /// needs the whole chain and lives in [`crate::chain::genesis_candidates`].
    #[must_use]
    pub fn is_genesis_marker(&self) -> bool {
        self.previous_verification_hash.is_empty()
    }

    /// Parse `local_timestamp` into a calendar date-time.
    ///
    /// # Errors
    ///
    /// Returns a [`TimestampError`] if the field is not a valid 14-digit
    /// `YYYYMMDDHHmmss` string.
    pub fn local_time(&self) -> Result<chrono::NaiveDateTime, TimestampError> {
        timestamp::parse_local_timestamp(&self.local_timestamp)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
