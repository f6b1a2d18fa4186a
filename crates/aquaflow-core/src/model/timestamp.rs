//! The compact `YYYYMMDDHHmmss` timestamp encoding.
//!
//! Aqua revisions carry their creation time as a 14-digit numeric string
//! (e.g. `"20250412153726"`), always interpreted as UTC. This module parses
//! that encoding into [`chrono::NaiveDateTime`] and formats it back into a
//! human-friendly form.

use chrono::NaiveDateTime;

/// Number of digits in a valid compact timestamp.
const COMPACT_LEN: usize = 14;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from parsing a compact timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    /// The input was not exactly 14 characters long.
    #[error("timestamp '{raw}' has {len} characters, expected 14 (YYYYMMDDHHmmss)")]
    WrongLength {
        /// The offending input.
        raw: String,
        /// Its actual length.
        len: usize,
    },

    /// The input contained a non-ASCII-digit character.
    #[error("timestamp '{raw}' contains non-digit characters")]
    NotNumeric {
        /// The offending input.
        raw: String,
    },

    /// The digits did not form a real calendar date/time (month 13, etc.).
    #[error("timestamp '{raw}' has out-of-range date or time components")]
    OutOfRange {
        /// The offending input.
        raw: String,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a compact `YYYYMMDDHHmmss` string into a date-time.
///
/// The encoding carries no zone; the Aqua tooling writes UTC wall time, so
/// the result should be treated as UTC.
///
/// # Errors
///
/// Returns a [`TimestampError`] describing which of the three checks failed:
/// length, digits-only, or calendar range.
pub fn parse_local_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    if raw.len() != COMPACT_LEN {
        return Err(TimestampError::WrongLength {
            raw: raw.to_string(),
            len: raw.len(),
        });
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampError::NotNumeric {
            raw: raw.to_string(),
        });
    }
    NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M%S").map_err(|_| TimestampError::OutOfRange {
        raw: raw.to_string(),
    })
}

/// Format a date-time the way the original tooling displays revision times,
/// e.g. `"12 Apr 2025, 15:37:26 UTC"`.
#[must_use]
pub fn format_human(ts: &NaiveDateTime) -> String {
    ts.format("%d %b %Y, %H:%M:%S UTC").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
