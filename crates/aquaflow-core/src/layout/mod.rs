//! Positioned graph layout for revision chains.
//!
//! Converts a linearized chain (plus any attached linked chains) into nodes
//! with `(x, y)` positions and typed edges, ready for a directed-graph
//! renderer. The main chain runs horizontally at `y = 0`; each linked chain
//! is laid out recursively below its parent revision, siblings stacking
//! further down so nothing overlaps.
//!
//! # Sub-modules
//!
//! - [`key`]: structural keys for linked chains. ([`LinkKey`],
//!   [`parse_linked_chains`])
//! - [`builder`]: the recursive layout pass. ([`build_layout`],
//!   [`ChainLayout`], [`LayoutNode`], [`LayoutEdge`])

#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod key;

pub use builder::{
    ChainLayout, EdgeKind, LayoutNode, LayoutEdge, Position, build_layout, layout_document,
    HORIZONTAL_SPACING, VERTICAL_SPACING,
};
pub use key::{LinkKey, parse_linked_chains};

use crate::chain::ChainError;

// ---------------------------------------------------------------------------
// Machine-readable error codes
// ---------------------------------------------------------------------------

/// Machine-readable codes for [`LayoutError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutErrorCode {
    /// A compound key did not split into exactly one parent hash and one
    /// linked-chain identifier.
    AmbiguousCompoundKey,
    /// A linked chain looped back into a chain still being expanded.
    CyclicLinkedChainReference,
    /// The main chain or a linked chain was malformed or disconnected.
    MalformedChain,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from layout construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A raw compound key could not be split unambiguously. Hashes may
    /// themselves contain the separator in some encodings, so anything
    /// other than exactly one `_` is rejected rather than guessed at.
    #[error("ambiguous compound key '{raw}': expected exactly one '_' separator")]
    AmbiguousCompoundKey {
        /// The offending raw key.
        raw: String,
    },

    /// Expanding a linked chain led back into a chain that is still being
    /// expanded — following it would recurse forever.
    #[error("linked chain '{key}' references a chain still being expanded")]
    CyclicLinkedChainReference {
        /// The key whose expansion closed the loop.
        key: LinkKey,
    },

    /// The main chain could not be reconstructed.
    #[error("main chain: {0}")]
    MainChain(#[from] ChainError),

    /// A linked chain could not be reconstructed.
    #[error("linked chain '{key}': {source}")]
    LinkedChain {
        /// The key of the offending linked chain.
        key: LinkKey,
        /// The underlying reconstruction error.
        source: ChainError,
    },
}

impl LayoutError {
    /// Return the machine-readable error code for this error.
    #[must_use]
    pub const fn code(&self) -> LayoutErrorCode {
        match self {
            Self::AmbiguousCompoundKey { .. } => LayoutErrorCode::AmbiguousCompoundKey,
            Self::CyclicLinkedChainReference { .. } => LayoutErrorCode::CyclicLinkedChainReference,
            Self::MainChain(_) | Self::LinkedChain { .. } => LayoutErrorCode::MalformedChain,
        }
    }
}
