//! Genesis and head detection.
//!
//! A revision qualifies as a *genesis candidate* when its predecessor pointer
//! is empty or names a hash outside the chain's key set. A revision
//! qualifies as a *head candidate* when no other revision names it as
//! predecessor. A well-formed chain has exactly one of each; anything else
//! is reported as a [`ChainError`] rather than silently resolved.

use std::collections::HashSet;

use crate::model::AquaTree;

use super::ChainError;

/// Return all genesis candidates, sorted by hash.
///
/// A candidate is a revision whose `previous_verification_hash` is empty or
/// not a key of the chain. Sorting makes the result independent of map
/// iteration order.
#[must_use]
pub fn genesis_candidates(tree: &AquaTree) -> Vec<&str> {
    let mut candidates: Vec<&str> = tree
        .revisions
        .iter()
        .filter(|(_, rev)| {
            rev.previous_verification_hash.is_empty()
                || !tree.contains(&rev.previous_verification_hash)
        })
        .map(|(hash, _)| hash.as_str())
        .collect();
    candidates.sort_unstable();
    candidates
}

/// Return the revisions that explicitly mark themselves as genesis (empty
/// predecessor pointer), sorted by hash.
#[must_use]
pub fn genesis_markers(tree: &AquaTree) -> Vec<&str> {
    let mut markers: Vec<&str> = tree
        .revisions
        .iter()
        .filter(|(_, rev)| rev.previous_verification_hash.is_empty())
        .map(|(hash, _)| hash.as_str())
        .collect();
    markers.sort_unstable();
    markers
}

/// Find the unique genesis revision of a chain.
///
/// An explicit genesis marker (empty predecessor pointer) takes precedence:
/// if exactly one revision carries one, it is the genesis, and any revision
/// with a dangling out-of-set pointer is left for the coverage check in
/// [`linearize`](super::linearize) to report as disconnected. Only when no
/// marker exists (a chain sliced out of a larger document) do the dangling
/// revisions compete as candidates.
///
/// # Errors
///
/// - [`ChainError::Empty`] for a chain with no revisions.
/// - [`ChainError::NoGenesis`] when every revision has an in-set
///   predecessor (the chain contains a cycle).
/// - [`ChainError::MultipleGenesis`] when more than one revision qualifies
///   at the same precedence tier; all candidates are listed.
pub fn find_genesis(tree: &AquaTree) -> Result<&str, ChainError> {
    if tree.is_empty() {
        return Err(ChainError::Empty);
    }
    let markers = genesis_markers(tree);
    let candidates = if markers.is_empty() {
        genesis_candidates(tree)
    } else {
        markers
    };
    match candidates.as_slice() {
        [] => Err(ChainError::NoGenesis),
        [only] => Ok(*only),
        many => {
            tracing::warn!(count = many.len(), "chain has multiple genesis candidates");
            Err(ChainError::MultipleGenesis {
                candidates: many.iter().map(ToString::to_string).collect(),
            })
        }
    }
}

/// Return all head candidates (revisions that are nobody's predecessor),
/// sorted by hash.
#[must_use]
pub fn head_candidates(tree: &AquaTree) -> Vec<&str> {
    let referenced: HashSet<&str> = tree
        .revisions
        .values()
        .map(|rev| rev.previous_verification_hash.as_str())
        .filter(|prev| !prev.is_empty())
        .collect();

    let mut candidates: Vec<&str> = tree
        .hashes()
        .filter(|hash| !referenced.contains(hash))
        .collect();
    candidates.sort_unstable();
    candidates
}

/// Find the unique head (latest) revision of a chain.
///
/// # Errors
///
/// - [`ChainError::Empty`] for a chain with no revisions.
/// - [`ChainError::NoHead`] when every revision is referenced as a
///   predecessor (the chain contains a cycle).
/// - [`ChainError::MultipleHeads`] when the chain forks; all candidates are
///   listed.
pub fn find_head(tree: &AquaTree) -> Result<&str, ChainError> {
    if tree.is_empty() {
        return Err(ChainError::Empty);
    }
    let candidates = head_candidates(tree);
    match candidates.as_slice() {
        [] => Err(ChainError::NoHead),
        [only] => Ok(*only),
        many => Err(ChainError::MultipleHeads {
            candidates: many.iter().map(ToString::to_string).collect(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
