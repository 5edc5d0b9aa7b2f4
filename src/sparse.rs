//! Popcount-compressed sparse array over a 256-slot index space
//! (spec.md §4.3).

use std::collections::TryReserveError;

use crate::bitset::Bitset256;

/// Maps `[0..255]` to a dense payload array, synchronized with a
/// [`Bitset256`]. The only coupling invariant: `rank(i) - 1` is the
/// position of slot `i`'s value in `dense`, for every set bit `i`.
#[derive(Clone)]
pub struct SparseArray256<T> {
    present: Bitset256,
    dense: Vec<T>,
}

impl<T> Default for SparseArray256<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseArray256<T> {
    #[must_use]
    pub fn new() -> Self {
        SparseArray256 {
            present: Bitset256::new(),
            dense: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_set(&self, i: u16) -> bool {
        self.present.is_set(i)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    #[must_use]
    pub fn get(&self, i: u16) -> Option<&T> {
        if self.present.is_set(i) {
            Some(&self.dense[self.dense_pos(i)])
        } else {
            None
        }
    }

    #[must_use]
    pub fn get_mut(&mut self, i: u16) -> Option<&mut T> {
        if self.present.is_set(i) {
            let pos = self.dense_pos(i);
            Some(&mut self.dense[pos])
        } else {
            None
        }
    }

    fn dense_pos(&self, i: u16) -> usize {
        self.present.rank(i) as usize - 1
    }

    /// Inserts `v` at slot `i`, returning the previous value if the slot
    /// was already set. Fails, leaving the array untouched, only if the
    /// dense array cannot grow (spec.md §7 "Allocation failure").
    pub fn try_insert(&mut self, i: u16, v: T) -> Result<Option<T>, TryReserveError> {
        if self.present.is_set(i) {
            let pos = self.dense_pos(i);
            let old = std::mem::replace(&mut self.dense[pos], v);
            return Ok(Some(old));
        }
        if self.dense.len() == self.dense.capacity() {
            self.dense.try_reserve(1)?;
        }
        let pos = self.present.rank(i) as usize;
        self.present.set(i);
        self.dense.insert(pos, v);
        Ok(None)
    }

    /// Convenience wrapper for callers that don't need to observe
    /// allocation failure (e.g. tests, or callers that have already
    /// reserved capacity out of band).
    pub fn insert(&mut self, i: u16, v: T) -> Option<T> {
        self.try_insert(i, v)
            .unwrap_or_else(|e| panic!("sparse array allocation failed: {e}"))
    }

    /// Removes and returns the value at slot `i`, shifting the tail left
    /// by one dense-array position.
    pub fn delete(&mut self, i: u16) -> Option<T> {
        if !self.present.is_set(i) {
            return None;
        }
        let pos = self.dense_pos(i);
        self.present.clear(i);
        Some(self.dense.remove(pos))
    }

    /// `f` receives `(old_or_default, was_present)` and returns the new
    /// value; updates in place or inserts.
    pub fn update<F>(&mut self, i: u16, default: T, f: F)
    where
        F: FnOnce(T, bool) -> T,
        T: Clone,
    {
        if self.present.is_set(i) {
            let pos = self.dense_pos(i);
            let old = self.dense[pos].clone();
            self.dense[pos] = f(old, true);
        } else {
            let v = f(default, false);
            self.insert(i, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &T)> {
        self.present.iter_set().zip(self.dense.iter()).map(|(i, v)| (i, v))
    }

    /// The highest set index intersecting `mask`, and its value — the
    /// LPM backtracking primitive (spec.md §4.4/§4.5).
    #[must_use]
    pub fn highest_in(&self, mask: &Bitset256) -> Option<(u16, &T)> {
        let i = self.present.intersection_top(mask)?;
        Some((i, self.get(i).expect("bitset/dense coupling invariant")))
    }
}
