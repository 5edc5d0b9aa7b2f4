//! Error taxonomy (spec.md §7). The only condition surfaced as `Err` is
//! allocation failure; invalid prefixes and misses are absorbed into
//! `Option`/silent no-ops, and internal invariant violations are logic
//! errors that panic via `debug_assert!` rather than being encoded here.

use std::collections::TryReserveError;
use std::fmt;

use thiserror::Error;

/// Failure mode for `Table::try_insert` and friends.
#[derive(Debug, Error)]
pub enum InsertError {
    /// The dense payload array backing a trie node's sparse array could
    /// not grow to hold the new entry.
    #[error("allocation failure while inserting: {0}")]
    Alloc(#[from] TryReserveError),
}

/// A prefix whose `bits` exceeds its address family's width. Returned by
/// the fallible prefix constructors that validate caller input at the
/// crate boundary (spec.md §7 "Invalid prefix").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPrefixLength {
    pub bits: u8,
    pub max_bits: u8,
}

impl fmt::Display for InvalidPrefixLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prefix length {} exceeds address family width {}",
            self.bits, self.max_bits
        )
    }
}

impl std::error::Error for InvalidPrefixLength {}
