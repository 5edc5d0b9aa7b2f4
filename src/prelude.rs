//! Convenience re-export of the public surface most callers need, matching
//! the teacher's `pub mod prelude` convention.

pub use crate::addr::{Address, Prefix};
pub use crate::error::{InsertError, InvalidPrefixLength};
pub use crate::table::Table;
