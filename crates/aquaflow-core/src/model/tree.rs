//! Aqua Tree containers: a revision chain plus its file index.
//!
//! An [`AquaTree`] is the `{revisions, file_index}` object of the external
//! JSON format. A [`ChainDocument`] is the visualizer's input file: an Aqua
//! Tree plus a `linkedChains` object whose keys are compound
//! `<parentHash>_<linkedId>` strings and whose values are themselves Aqua
//! Trees.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::revision::Revision;

// ---------------------------------------------------------------------------
// AquaTree
// ---------------------------------------------------------------------------

/// One connected revision chain, keyed by revision hash, plus the file index
/// mapping revision hashes to the file names they introduced.
///
/// The map types mirror the JSON objects; ordering is never taken from map
/// iteration (see [`crate::chain`]).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AquaTree {
    /// All revisions, keyed by content hash.
    pub revisions: HashMap<String, Revision>,

    /// Revision hash → file name, for revisions that introduced a file.
    #[serde(default)]
    pub file_index: HashMap<String, String>,
}

impl AquaTree {
    /// Number of revisions in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Returns `true` if the tree has no revisions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Look up a revision by hash.
    #[must_use]
    pub fn get(&self, hash: &str) -> Option<&Revision> {
        self.revisions.get(hash)
    }

    /// Returns `true` if the tree contains a revision with the given hash.
    #[must_use]
    pub fn contains(&self, hash: &str) -> bool {
        self.revisions.contains_key(hash)
    }

    /// Iterate over all revision hashes (unordered).
    pub fn hashes(&self) -> impl Iterator<Item = &str> {
        self.revisions.keys().map(String::as_str)
    }

    /// The file name the genesis revision introduced, if the chain is
    /// well-formed and the genesis appears in the file index.
    ///
    /// Malformed chains (no genesis, several candidates) yield `None`; use
    /// [`crate::chain::find_genesis`] directly to learn why.
    #[must_use]
    pub fn genesis_file_name(&self) -> Option<&str> {
        let genesis = crate::chain::find_genesis(self).ok()?;
        self.file_index.get(genesis).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// ChainDocument
// ---------------------------------------------------------------------------

/// The visualizer input document: a main chain plus linked chains keyed by
/// compound strings.
///
/// The compound keys are kept raw here; [`crate::layout::parse_linked_chains`]
/// converts them into structural [`crate::layout::LinkKey`]s (and rejects
/// ambiguous ones) before layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChainDocument {
    /// The main chain and its file index.
    #[serde(flatten)]
    pub tree: AquaTree,

    /// Linked chains, keyed by raw `<parentHash>_<linkedId>` compound string.
    #[serde(rename = "linkedChains", default)]
    pub linked_chains: HashMap<String, AquaTree>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
