//! Simple example payload types, for callers who want something more
//! descriptive than a bare integer to plug in as `Table<V>`'s `V`. The
//! table itself is agnostic to payload shape (spec.md §1 "Payloads are
//! generic"); these are conveniences, not part of the engine.

use std::fmt;

/// A BGP AS number attached to a prefix, the canonical "hello world"
/// payload for a routing table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrefixAs(pub u32);

impl fmt::Display for PrefixAs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

/// Tree-wide empty payload type, for tables used purely as prefix sets
/// (membership/overlap queries) with no associated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoMeta;

impl fmt::Display for NoMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("-")
    }
}
