//! Revision-chain reconstruction.
//!
//! A chain arrives as an unordered hash → revision mapping whose records
//! point *backwards* (`previous_verification_hash`). Reconstruction inverts
//! those pointers and walks forward:
//!
//! - [`genesis`]: find the unique revision with no in-set predecessor.
//!   ([`find_genesis`], [`genesis_candidates`], [`find_head`])
//! - [`index`]: one-pass predecessor → successor index, replacing the
//!   quadratic forward-pointer rescan. ([`SuccessorIndex`])
//! - [`linearize`]: the forward walk with cycle guard and full-coverage
//!   check. ([`linearize`](linearize::linearize), [`linearize_from`])
//!
//! # Determinism
//!
//! No operation depends on map iteration order: candidate sets are sorted
//! before inspection and index conflicts resolve to the lexicographically
//! smallest hash. Same input, same output, every time.

#![allow(clippy::module_name_repetitions)]

pub mod genesis;
pub mod index;
pub mod linearize;

pub use genesis::{find_genesis, find_head, genesis_candidates, genesis_markers, head_candidates};
pub use index::SuccessorIndex;
pub use linearize::{linearize, linearize_from};

// ---------------------------------------------------------------------------
// Machine-readable error codes
// ---------------------------------------------------------------------------

/// Machine-readable codes for [`ChainError`], matching the error taxonomy of
/// the chain format: a malformed chain is one whose shape prevents picking a
/// single genesis or head, a disconnected chain is one whose walk from
/// genesis does not reach every revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainErrorCode {
    /// The chain had no revisions at all.
    Empty,
    /// No unambiguous genesis/head exists (cycle or multiple roots).
    MalformedChain,
    /// Some revisions are unreachable from the genesis.
    DisconnectedRevisions,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from chain reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// The chain contained no revisions.
    #[error("chain is empty")]
    Empty,

    /// Every revision has an in-set predecessor, so no genesis exists. This
    /// implies at least one cycle.
    #[error("no genesis revision: every revision has an in-set predecessor (cycle)")]
    NoGenesis,

    /// More than one revision qualifies as genesis. The upstream tooling
    /// silently picked whichever it scanned first; here the ambiguity is an
    /// error and all candidates are reported.
    #[error("multiple genesis candidates: {}", candidates.join(", "))]
    MultipleGenesis {
        /// All qualifying hashes, sorted.
        candidates: Vec<String>,
    },

    /// Every revision is some other revision's predecessor, so no head
    /// exists. This implies at least one cycle.
    #[error("no head revision: every revision is another revision's predecessor (cycle)")]
    NoHead,

    /// More than one revision qualifies as head (the chain forks).
    #[error("multiple head candidates: {}", candidates.join(", "))]
    MultipleHeads {
        /// All qualifying hashes, sorted.
        candidates: Vec<String>,
    },

    /// The forward walk from genesis ended before covering the whole chain.
    /// `reached` is the walked prefix in order; `unreached` enumerates every
    /// hash the walk never saw, sorted.
    #[error(
        "linearization reached {} of {} revisions; unreached: {}",
        reached.len(),
        reached.len() + unreached.len(),
        unreached.join(", ")
    )]
    Disconnected {
        /// The revisions the walk visited, in walk order.
        reached: Vec<String>,
        /// The revisions the walk never visited, sorted.
        unreached: Vec<String>,
    },
}

impl ChainError {
    /// Return the machine-readable error code for this error.
    #[must_use]
    pub const fn code(&self) -> ChainErrorCode {
        match self {
            Self::Empty => ChainErrorCode::Empty,
            Self::NoGenesis
            | Self::MultipleGenesis { .. }
            | Self::NoHead
            | Self::MultipleHeads { .. } => ChainErrorCode::MalformedChain,
            Self::Disconnected { .. } => ChainErrorCode::DisconnectedRevisions,
        }
    }
}
