//! Validation errors for catechism entries.
//!
//! Transport and decode failures live in `cic-gateway`; this module only
//! covers the per-entry invariants of the data model.

use thiserror::Error;

/// Why an entry was rejected at the validation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryViolation {
    /// Paragraph numbers start at 1.
    #[error("paragraph number must be positive")]
    ZeroNumber,

    #[error("paragraph {number} has empty text")]
    EmptyText { number: u32 },

    #[error("paragraph {number} has empty topic")]
    EmptyTopic { number: u32 },

    /// Another entry in the same result set already used this number.
    #[error("paragraph {0} appears more than once")]
    DuplicateNumber(u32),
}
