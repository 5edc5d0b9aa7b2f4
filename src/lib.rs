//! A multibit-trie based IP routing table.
//!
//! In-memory longest-prefix-match storage and retrieval for IPv4 and IPv6
//! prefixes, with generic payloads, an `Arc`-backed persistent (copy-on-write)
//! variant, and a small C ABI for embedding.
//!
//! The underlying structure is an 8-bit-stride multibit trie: popcount-
//! compressed sparse arrays hold each node's inner prefixes and child
//! slots, and longest-prefix-match backtracks through a precomputed
//! ancestor bitset rather than walking the trie a second time.
//!
//! Read more about the tree-bitmap family of structures in
//! [the original paper](https://www.cs.cornell.edu/courses/cs419/2005sp/tree-bitmap.pdf).

mod addr;
mod af;
mod bitset;
mod error;
mod idx;
mod node;
mod sparse;
mod table;

pub mod ffi;

/// Some simple example payload types for `Table<V>`.
pub mod meta_examples;

pub mod prelude;

pub use crate::addr::{Address, Prefix};
pub use crate::error::{InsertError, InvalidPrefixLength};
pub use crate::table::Table;
