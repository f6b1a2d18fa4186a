//! Structural validation of a whole Aqua Tree.
//!
//! Upstream tooling validated trees with a boolean plus a message, stopping
//! at the first problem. Here every check runs and every finding comes back
//! as a typed [`ValidationIssue`], so a caller can show the user all of what
//! is wrong with a document at once.
//!
//! Checks performed:
//!
//! 1. The tree has at least one revision.
//! 2. Every revision's `local_timestamp` parses.
//! 3. Exactly one genesis exists.
//! 4. The forward walk from genesis covers every revision.
//! 5. Every `file_index` key names a known revision hash.

use crate::chain::{self, ChainError};
use crate::model::{AquaTree, TimestampError};

// ---------------------------------------------------------------------------
// ValidationIssue
// ---------------------------------------------------------------------------

/// One problem found in an Aqua Tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    /// The tree holds no revisions at all.
    #[error("tree has no revisions")]
    EmptyTree,

    /// A revision's `local_timestamp` is not a valid compact timestamp.
    #[error("revision {hash}: {source}")]
    BadTimestamp {
        /// The revision with the bad timestamp.
        hash: String,
        /// What was wrong with it.
        source: TimestampError,
    },

    /// Genesis detection failed (none, or several candidates).
    #[error("genesis: {0}")]
    Genesis(ChainError),

    /// Linearization from the genesis missed some revisions.
    #[error("disconnected: {}", unreached.join(", "))]
    Disconnected {
        /// The hashes the walk never reached, sorted.
        unreached: Vec<String>,
    },

    /// A `file_index` entry points at a hash with no revision.
    #[error("file index references unknown revision {hash}")]
    DanglingFileIndex {
        /// The unknown hash.
        hash: String,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate a tree structurally, collecting every issue found.
///
/// # Errors
///
/// Returns all issues, ordered deterministically: emptiness first, then
/// timestamps (by hash), then genesis/coverage, then file-index entries
/// (by hash).
pub fn validate_tree(tree: &AquaTree) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if tree.is_empty() {
        issues.push(ValidationIssue::EmptyTree);
        return Err(issues);
    }

    let mut hashes: Vec<&str> = tree.hashes().collect();
    hashes.sort_unstable();

    for hash in &hashes {
        if let Some(rev) = tree.get(hash) {
            if let Err(source) = rev.local_time() {
                issues.push(ValidationIssue::BadTimestamp {
                    hash: (*hash).to_string(),
                    source,
                });
            }
        }
    }

    match chain::linearize(tree) {
        Ok(_) => {}
        Err(ChainError::Disconnected { unreached, .. }) => {
            issues.push(ValidationIssue::Disconnected { unreached });
        }
        Err(err) => issues.push(ValidationIssue::Genesis(err)),
    }

    let mut index_hashes: Vec<&str> = tree.file_index.keys().map(String::as_str).collect();
    index_hashes.sort_unstable();
    for hash in index_hashes {
        if !tree.contains(hash) {
            issues.push(ValidationIssue::DanglingFileIndex {
                hash: hash.to_string(),
            });
        }
    }

    if issues.is_empty() { Ok(()) } else { Err(issues) }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
