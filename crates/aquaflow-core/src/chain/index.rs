//! Predecessor → successor index.
//!
//! Revisions store backward pointers, but linearization walks forward. The
//! naive forward lookup (scan the whole chain for the revision whose
//! predecessor equals the current hash) costs O(n) per step and O(n²) per
//! chain; workflow trees routinely link hundreds of revisions. Building this
//! index once turns every forward lookup into O(1).

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::model::AquaTree;

/// An inverted index over a chain's backward pointers.
///
/// Maps each revision hash to the hash of its successor (the revision that
/// names it as predecessor). In a well-formed chain every revision except
/// the head has exactly one successor.
///
/// # Forks
///
/// If two revisions claim the same predecessor, the lexicographically
/// smallest successor wins, deterministically, and a warning is logged. The
/// bypassed arm is unreachable from genesis and surfaces through the
/// coverage check in [`crate::chain::linearize`].
#[derive(Debug, Clone, Default)]
pub struct SuccessorIndex {
    next: HashMap<String, String>,
}

impl SuccessorIndex {
    /// Build the index in one O(n) pass over the chain.
    #[must_use]
    pub fn build(tree: &AquaTree) -> Self {
        let mut next: HashMap<String, String> = HashMap::with_capacity(tree.len());

        for (hash, rev) in &tree.revisions {
            let prev = &rev.previous_verification_hash;
            if prev.is_empty() || !tree.contains(prev) {
                continue;
            }
            match next.entry(prev.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(hash.clone());
                }
                Entry::Occupied(mut slot) => {
                    tracing::warn!(
                        predecessor = %prev,
                        "chain forks: two revisions share a predecessor"
                    );
                    if hash < slot.get() {
                        slot.insert(hash.clone());
                    }
                }
            }
        }

        Self { next }
    }

    /// The successor of `hash`, if one exists in the indexed chain.
    #[must_use]
    pub fn successor_of(&self, hash: &str) -> Option<&str> {
        self.next.get(hash).map(String::as_str)
    }

    /// Number of forward links in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.next.len()
    }

    /// Returns `true` if the index holds no forward links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
