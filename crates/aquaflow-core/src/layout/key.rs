//! Structural keys for linked chains.
//!
//! The wire format keys linked chains by string concatenation:
//! `"<parentHash>_<linkedId>"`. Concatenation cannot distinguish a separator
//! from an underscore inside a hash, so internally the two halves live in a
//! [`LinkKey`] struct with structural equality, and parsing the wire form is
//! strict: exactly one `_`, both halves non-empty.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::model::AquaTree;

use super::LayoutError;

// ---------------------------------------------------------------------------
// LinkKey
// ---------------------------------------------------------------------------

/// Identifies one linked chain: which revision of the parent chain it hangs
/// off, and the linked chain's own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LinkKey {
    /// Hash of the parent-chain revision the linked chain attaches to.
    pub parent: String,
    /// Identifier of the linked chain (its genesis hash upstream).
    pub linked: String,
}

impl LinkKey {
    /// Create a key from its two halves.
    #[must_use]
    pub fn new(parent: impl Into<String>, linked: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            linked: linked.into(),
        }
    }

    /// Parse a wire-format compound key.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::AmbiguousCompoundKey`] unless the input
    /// contains exactly one `_` with non-empty text on both sides. Keys
    /// with zero or several underscores cannot be split reliably because
    /// hashes may contain `_` in some encodings.
    pub fn parse(raw: &str) -> Result<Self, LayoutError> {
        let mut parts = raw.split('_');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(parent), Some(linked), None) if !parent.is_empty() && !linked.is_empty() => {
                Ok(Self::new(parent, linked))
            }
            _ => Err(LayoutError::AmbiguousCompoundKey {
                raw: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.parent, self.linked)
    }
}

// ---------------------------------------------------------------------------
// Wire-map conversion
// ---------------------------------------------------------------------------

/// Convert a wire-format `linkedChains` object into a structurally keyed map.
///
/// The result is a `BTreeMap` so downstream iteration is deterministic.
///
/// # Errors
///
/// Returns the first [`LayoutError::AmbiguousCompoundKey`] encountered, by
/// sorted raw-key order (so the reported key does not depend on map
/// iteration order).
pub fn parse_linked_chains(
    raw: &HashMap<String, AquaTree>,
) -> Result<BTreeMap<LinkKey, AquaTree>, LayoutError> {
    let mut entries: Vec<(&String, &AquaTree)> = raw.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut parsed = BTreeMap::new();
    for (raw_key, chain) in entries {
        let key = LinkKey::parse(raw_key)?;
        parsed.insert(key, chain.clone());
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
