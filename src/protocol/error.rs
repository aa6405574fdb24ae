//! Diagnostic error untuk ByteStream
//!
//! Stream tidak pernah mengembalikan error per-field. Kegagalan pertama
//! dicatat di sini supaya caller bisa tahu kenapa `is_valid()` menjadi false.

use thiserror::Error;

/// Alasan kegagalan pertama yang membuat stream invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// Read meminta lebih banyak bytes daripada yang tersisa.
    #[error("buffer underrun at offset {offset}: requested {requested} bytes, {available} available")]
    Underrun {
        offset: usize,
        requested: usize,
        available: usize,
    },

    /// Length prefix melebihi batas `StreamConfig::max_declared_len`.
    #[error("declared length {declared} exceeds configured limit {limit}")]
    LengthLimit { declared: u32, limit: u32 },

    /// Buffer tujuan caller terlalu kecil (payload + terminator).
    #[error("destination too small: need {needed} slots, capacity is {capacity}")]
    CapacityExceeded { needed: usize, capacity: usize },
}
