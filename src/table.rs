//! Thin façade dispatching to the v4/v6 root tries (spec.md §4.6).
//!
//! `Table` owns no locking of its own: the mutable API requires external
//! synchronization (spec.md §5), while the `*_persist` variants build on
//! the node layer's `Arc`-based structural sharing to hand back an
//! independent snapshot without disturbing readers of the old one.

use log::info;

use crate::addr::{Address, Prefix};
use crate::error::InsertError;
use crate::node::StrideNode;

/// An in-memory IP routing table supporting longest-prefix-match lookup
/// for both IPv4 and IPv6 (spec.md §3 "Table").
#[derive(Clone)]
pub struct Table<V: Clone> {
    root4: StrideNode<V>,
    root6: StrideNode<V>,
    size4: usize,
    size6: usize,
}

impl<V: Clone> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Table<V> {
    #[must_use]
    pub fn new() -> Self {
        info!("creating new routing table");
        Table {
            root4: StrideNode::new(),
            root6: StrideNode::new(),
            size4: 0,
            size6: 0,
        }
    }

    fn root(&self, v4: bool) -> &StrideNode<V> {
        if v4 {
            &self.root4
        } else {
            &self.root6
        }
    }

    fn root_mut(&mut self, v4: bool) -> &mut StrideNode<V> {
        if v4 {
            &mut self.root4
        } else {
            &mut self.root6
        }
    }

    /// Inserts `(prefix, value)`, canonicalizing `prefix` first, returning
    /// the previous value at that exact prefix if any. The only failure
    /// mode is allocation failure, which leaves the table untouched
    /// (spec.md §7 "Allocation failure").
    pub fn try_insert(&mut self, prefix: &Prefix, value: V) -> Result<Option<V>, InsertError> {
        let canon = prefix.canonicalize();
        let is_v4 = canon.addr.is_v4();
        let old = self.root_mut(is_v4).insert(0, &canon, value)?;
        if old.is_none() {
            if is_v4 {
                self.size4 += 1;
            } else {
                self.size6 += 1;
            }
        }
        Ok(old)
    }

    /// Convenience wrapper over [`Table::try_insert`] for callers that
    /// treat allocation failure as fatal (the teacher's own `insert`
    /// surface does the same: panic rather than propagate an `Err` every
    /// caller would just `.unwrap()` anyway).
    pub fn insert(&mut self, prefix: &Prefix, value: V) -> Option<V> {
        self.try_insert(prefix, value)
            .unwrap_or_else(|e| panic!("routing table allocation failed: {e}"))
    }

    /// Removes `prefix` exactly, returning its value if present.
    pub fn delete(&mut self, prefix: &Prefix) -> Option<V> {
        let canon = prefix.canonicalize();
        let is_v4 = canon.addr.is_v4();
        let old = self.root_mut(is_v4).delete(0, &canon);
        if old.is_some() {
            if is_v4 {
                self.size4 -= 1;
            } else {
                self.size6 -= 1;
            }
        }
        old
    }

    /// In-place update: `f` sees the current value (if any) and returns
    /// the value to store. Returns the previous value.
    pub fn update<F>(&mut self, prefix: &Prefix, f: F) -> Option<V>
    where
        F: FnOnce(Option<&V>) -> V,
    {
        let canon = prefix.canonicalize();
        let existing = self.get(&canon).cloned();
        let new_value = f(existing.as_ref());
        self.insert(&canon, new_value);
        existing
    }

    /// Exact-match lookup: `Some` only if `prefix` itself was inserted.
    #[must_use]
    pub fn get(&self, prefix: &Prefix) -> Option<&V> {
        let canon = prefix.canonicalize();
        self.root(canon.addr.is_v4()).get(0, &canon)
    }

    /// Longest-prefix-match lookup for `addr`.
    #[must_use]
    pub fn lookup(&self, addr: &Address) -> Option<(Prefix, &V)> {
        self.root(addr.is_v4()).lpm(0, addr)
    }

    /// `true` iff some stored prefix covers `addr`.
    #[must_use]
    pub fn contains(&self, addr: &Address) -> bool {
        self.root(addr.is_v4()).contains(0, addr)
    }

    /// `true` iff any stored prefix overlaps `prefix` (spec.md §4.5
    /// "Contains and overlap").
    #[must_use]
    pub fn overlaps_prefix(&self, prefix: &Prefix) -> bool {
        let canon = prefix.canonicalize();
        self.root(canon.addr.is_v4()).overlaps_prefix(0, &canon)
    }

    /// `true` iff `self` and `other` share any overlapping prefix in
    /// either address family.
    #[must_use]
    pub fn overlaps(&self, other: &Table<V>) -> bool {
        self.root4.overlaps_with(&other.root4) || self.root6.overlaps_with(&other.root6)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size4 + self.size6
    }

    #[must_use]
    pub fn size_v4(&self) -> usize {
        self.size4
    }

    #[must_use]
    pub fn size_v6(&self) -> usize {
        self.size6
    }

    /// Copy-on-write insert: returns a new table with `(prefix, value)`
    /// inserted, leaving `self` untouched. Untouched subtrees are shared
    /// with `self` by reference count (spec.md §4.5 "Persistence").
    #[must_use]
    pub fn insert_persist(&self, prefix: &Prefix, value: V) -> Table<V> {
        let mut new = self.clone();
        new.insert(prefix, value);
        new
    }

    /// Copy-on-write delete; see [`Table::insert_persist`].
    #[must_use]
    pub fn delete_persist(&self, prefix: &Prefix) -> Table<V> {
        let mut new = self.clone();
        new.delete(prefix);
        new
    }

    /// Copy-on-write update; see [`Table::insert_persist`].
    #[must_use]
    pub fn update_persist<F>(&self, prefix: &Prefix, f: F) -> Table<V>
    where
        F: FnOnce(Option<&V>) -> V,
    {
        let mut new = self.clone();
        new.update(prefix, f);
        new
    }
}
