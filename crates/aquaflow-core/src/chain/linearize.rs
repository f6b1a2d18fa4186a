//! Forward linearization of a revision chain.
//!
//! Starting at the genesis, repeatedly follow the successor link until the
//! head. A visited set guards against pointer cycles, and the strict entry
//! point checks that the walk covered every revision — a shorter walk means
//! the chain is disconnected, which is an error to surface, never data to
//! drop silently.

use std::collections::HashSet;

use crate::model::AquaTree;

use super::genesis::find_genesis;
use super::index::SuccessorIndex;
use super::ChainError;

/// Walk forward from `genesis`, returning the visited hashes in order.
///
/// The walk stops at the head (no successor) or when a successor was already
/// visited (a cycle among the forward links). The result may be shorter than
/// the chain when revisions are unreachable from `genesis`; callers wanting
/// that detected should use [`linearize`], callers rendering a best-effort
/// partial view can use this directly.
///
/// `genesis` is trusted as a starting point and is not re-derived; pass the
/// result of [`find_genesis`] (or a candidate of
/// [`genesis_candidates`](super::genesis_candidates) for diagnostics).
#[must_use]
pub fn linearize_from(tree: &AquaTree, genesis: &str) -> Vec<String> {
    if !tree.contains(genesis) {
        return Vec::new();
    }

    let index = SuccessorIndex::build(tree);
    let mut order: Vec<String> = Vec::with_capacity(tree.len());
    let mut visited: HashSet<&str> = HashSet::with_capacity(tree.len());

    let mut current = genesis;
    visited.insert(current);
    order.push(current.to_string());

    while let Some(next) = index.successor_of(current) {
        if !visited.insert(next) {
            tracing::warn!(hash = %next, "forward walk revisited a hash; stopping");
            break;
        }
        order.push(next.to_string());
        current = next;
    }

    order
}

/// Linearize a whole chain: find the genesis, walk forward, and require
/// full coverage.
///
/// # Errors
///
/// - Any error of [`find_genesis`] (empty, no genesis, multiple genesis).
/// - [`ChainError::Disconnected`] when the walk reached fewer revisions
///   than the chain holds. The error carries the walked prefix in order and
///   every unreached hash sorted, so the caller can still render a partial
///   graph or name the strays.
pub fn linearize(tree: &AquaTree) -> Result<Vec<String>, ChainError> {
    let genesis = find_genesis(tree)?;
    let order = linearize_from(tree, genesis);

    if order.len() < tree.len() {
        let reached: HashSet<&str> = order.iter().map(String::as_str).collect();
        let mut unreached: Vec<String> = tree
            .hashes()
            .filter(|hash| !reached.contains(hash))
            .map(ToString::to_string)
            .collect();
        unreached.sort_unstable();
        return Err(ChainError::Disconnected {
            reached: order,
            unreached,
        });
    }

    Ok(order)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
