//! The multibit-trie engine: `StrideNode`, one octet (8 bits) per level,
//! with inner prefixes, path-compressed leaves and fringes, and
//! `Arc`-shared children so the mutable and persistent APIs can run the
//! same mutation routine (spec.md §4.5, §4.6).

use std::sync::Arc;

use log::{debug, trace};

use crate::addr::{Address, Prefix};
use crate::error::InsertError;
use crate::idx::{host_idx, idx_to_range, BACKTRACK, PFX_TO_IDX};
use crate::sparse::SparseArray256;

/// A path-compressed leaf: a prefix that does not yet warrant its own
/// stride node, stored wherever it first lands in the walk.
#[derive(Clone)]
struct LeafEntry<V> {
    prefix: Prefix,
    value: V,
}

/// One stride level of the trie: up to 256 octet slots, each of which
/// holds at most one of an inner prefix, a child node, a leaf or a
/// fringe (spec.md §3 "Stride node").
#[derive(Clone)]
pub(crate) struct StrideNode<V: Clone> {
    prefixes: SparseArray256<V>,
    children: SparseArray256<Arc<StrideNode<V>>>,
    leaves: SparseArray256<LeafEntry<V>>,
    fringes: SparseArray256<V>,
}

impl<V: Clone> Default for StrideNode<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Is `b` an ancestor of (or equal to) `a` in the complete binary tree
/// that node-local indices describe?
fn is_ancestor(ancestor: u16, mut node: u16) -> bool {
    while node > ancestor {
        node >>= 1;
    }
    node == ancestor
}

/// Do the octet ranges that `a` and `b` represent overlap? In a complete
/// binary tree two ranges either nest or are disjoint, never partially
/// overlapping, so this reduces to an ancestor check either way.
fn idx_overlaps(a: u16, b: u16) -> bool {
    is_ancestor(a, b) || is_ancestor(b, a)
}

impl<V: Clone> StrideNode<V> {
    pub(crate) fn new() -> Self {
        StrideNode {
            prefixes: SparseArray256::new(),
            children: SparseArray256::new(),
            leaves: SparseArray256::new(),
            fringes: SparseArray256::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
            && self.children.is_empty()
            && self.leaves.is_empty()
            && self.fringes.is_empty()
    }

    /// Inserts `prefix` (whose leading `depth` octets this node already
    /// represents), returning the previous value at that exact prefix, if
    /// any (spec.md §4.5 "Insert").
    pub(crate) fn insert(
        &mut self,
        depth: u8,
        prefix: &Prefix,
        value: V,
    ) -> Result<Option<V>, InsertError> {
        let max_depth = prefix.max_depth();
        let octet = prefix.addr.octet(depth);
        trace!("insert: depth={depth} octet={octet} bits={}", prefix.bits);

        if depth == max_depth {
            let idx = PFX_TO_IDX[prefix.last_bits() as usize][octet as usize] as u16;
            return self.prefixes.try_insert(idx, value).map_err(InsertError::Alloc);
        }

        if let Some(child) = self.children.get_mut(octet as u16) {
            return Arc::make_mut(child).insert(depth + 1, prefix, value);
        }

        if let Some(leaf) = self.leaves.get_mut(octet as u16) {
            if leaf.prefix == *prefix {
                return Ok(Some(std::mem::replace(&mut leaf.value, value)));
            }
            let existing = self.leaves.delete(octet as u16).expect("just matched");
            let mut child = StrideNode::new();
            child.insert(depth + 1, &existing.prefix, existing.value)?;
            let result = child.insert(depth + 1, prefix, value)?;
            debug!("insert: promoted leaf to node at depth={}", depth + 1);
            self.children
                .try_insert(octet as u16, Arc::new(child))
                .map_err(InsertError::Alloc)?;
            return Ok(result);
        }

        if self.fringes.is_set(octet as u16) {
            if prefix.is_fringe_at(depth) {
                let slot = self.fringes.get_mut(octet as u16).expect("just checked");
                return Ok(Some(std::mem::replace(slot, value)));
            }
            let existing_value = self.fringes.delete(octet as u16).expect("just checked");
            let mut child = StrideNode::new();
            // The fringe's implicit prefix is the default route (index 1)
            // of the node one level deeper.
            child
                .prefixes
                .try_insert(1, existing_value)
                .map_err(InsertError::Alloc)?;
            let result = child.insert(depth + 1, prefix, value)?;
            debug!("insert: promoted fringe to node at depth={}", depth + 1);
            self.children
                .try_insert(octet as u16, Arc::new(child))
                .map_err(InsertError::Alloc)?;
            return Ok(result);
        }

        if prefix.is_fringe_at(depth) {
            self.fringes
                .try_insert(octet as u16, value)
                .map_err(InsertError::Alloc)?;
        } else {
            self.leaves
                .try_insert(
                    octet as u16,
                    LeafEntry {
                        prefix: *prefix,
                        value,
                    },
                )
                .map_err(InsertError::Alloc)?;
        }
        Ok(None)
    }

    /// Removes `prefix` exactly, collapsing any child node left empty by
    /// the removal (spec.md §4.5 "Delete").
    pub(crate) fn delete(&mut self, depth: u8, prefix: &Prefix) -> Option<V> {
        let max_depth = prefix.max_depth();
        let octet = prefix.addr.octet(depth);

        if depth == max_depth {
            let idx = PFX_TO_IDX[prefix.last_bits() as usize][octet as usize] as u16;
            return self.prefixes.delete(idx);
        }

        if let Some(child) = self.children.get_mut(octet as u16) {
            let node = Arc::make_mut(child);
            let removed = node.delete(depth + 1, prefix);
            if removed.is_some() && node.is_empty() {
                self.children.delete(octet as u16);
                debug!("delete: collapsed empty child at depth={}", depth + 1);
            }
            return removed;
        }

        if let Some(leaf) = self.leaves.get(octet as u16) {
            if leaf.prefix == *prefix {
                return self.leaves.delete(octet as u16).map(|l| l.value);
            }
            return None;
        }

        if prefix.is_fringe_at(depth) && self.fringes.is_set(octet as u16) {
            return self.fringes.delete(octet as u16);
        }

        None
    }

    /// Exact-match lookup: returns the value only if `prefix` itself was
    /// inserted (spec.md §4.5 "Get").
    pub(crate) fn get(&self, depth: u8, prefix: &Prefix) -> Option<&V> {
        let max_depth = prefix.max_depth();
        let octet = prefix.addr.octet(depth);

        if depth == max_depth {
            let idx = PFX_TO_IDX[prefix.last_bits() as usize][octet as usize] as u16;
            return self.prefixes.get(idx);
        }

        if let Some(child) = self.children.get(octet as u16) {
            return child.get(depth + 1, prefix);
        }
        if let Some(leaf) = self.leaves.get(octet as u16) {
            return if leaf.prefix == *prefix {
                Some(&leaf.value)
            } else {
                None
            };
        }
        if prefix.is_fringe_at(depth) {
            return self.fringes.get(octet as u16);
        }
        None
    }

    /// Longest-prefix-match lookup for `addr`, returning the winning
    /// prefix and its value. Descends first, then — on the way back up —
    /// backtracks through this node's inner prefixes via the
    /// precomputed ancestor bitset (spec.md §4.4, §4.5 "Lookup").
    ///
    /// A result found deeper in the trie is always strictly more
    /// specific than any inner prefix this node itself holds, so there is
    /// never a need to compare lengths: `deeper` wins whenever it exists.
    pub(crate) fn lpm<'a>(&'a self, depth: u8, addr: &Address) -> Option<(Prefix, &'a V)> {
        let octet = addr.octet(depth);

        let deeper = if let Some(child) = self.children.get(octet as u16) {
            child.lpm(depth + 1, addr)
        } else if let Some(leaf) = self.leaves.get(octet as u16) {
            if leaf.prefix.contains(addr) {
                Some((leaf.prefix, &leaf.value))
            } else {
                None
            }
        } else if let Some(fringe_value) = self.fringes.get(octet as u16) {
            let bits = 8 * (depth + 1);
            let fringe_prefix = Prefix {
                addr: addr.masked(bits),
                bits,
            };
            Some((fringe_prefix, fringe_value))
        } else {
            None
        };

        if deeper.is_some() {
            return deeper;
        }

        let h = host_idx(octet);
        let (idx, value) = self.prefixes.highest_in(&BACKTRACK[h as usize])?;
        let (_, pfx_len) = crate::idx::idx_to_pfx(idx as u8);
        let bits = depth * 8 + pfx_len;
        Some((
            Prefix {
                addr: addr.masked(bits),
                bits,
            },
            value,
        ))
    }

    /// Membership test for `addr`: does any stored prefix cover it?
    pub(crate) fn contains(&self, depth: u8, addr: &Address) -> bool {
        self.lpm(depth, addr).is_some()
    }

    /// Does any stored prefix (inner, leaf or fringe) overlap `prefix`?
    /// (spec.md §4.5 "Overlaps").
    pub(crate) fn overlaps_prefix(&self, depth: u8, prefix: &Prefix) -> bool {
        let max_depth = prefix.max_depth();
        let octet = prefix.addr.octet(depth);

        if depth == max_depth {
            let idx = PFX_TO_IDX[prefix.last_bits() as usize][octet as usize];
            if self.prefixes.iter().any(|(i, _)| idx_overlaps(i, idx as u16)) {
                return true;
            }
            let (first, last) = idx_to_range(idx);
            return (first..=last).any(|o| {
                self.children.is_set(o as u16)
                    || self.leaves.is_set(o as u16)
                    || self.fringes.is_set(o as u16)
            });
        }

        // A less-specific inner prefix stored at this node may already
        // cover the queried octet, independent of what lies further down
        // (spec.md §4.5: test inner prefixes "at or below" the node).
        let h = host_idx(octet);
        if self.prefixes.highest_in(&BACKTRACK[h as usize]).is_some() {
            return true;
        }

        if prefix.is_fringe_at(depth) {
            return self.children.is_set(octet as u16)
                || self.leaves.is_set(octet as u16)
                || self.fringes.is_set(octet as u16);
        }

        if let Some(child) = self.children.get(octet as u16) {
            return child.overlaps_prefix(depth + 1, prefix);
        }
        if let Some(leaf) = self.leaves.get(octet as u16) {
            return prefix.contains(&leaf.prefix.addr) || leaf.prefix.contains(&prefix.addr);
        }
        self.fringes.is_set(octet as u16)
    }

    /// Pairwise table-vs-table overlap: descends both tries in lockstep,
    /// returning `true` on the first mutual presence in the same slot
    /// (spec.md §4.5 "Overlaps"). Any entry reached through a child node
    /// is, by construction, non-empty (nodes are collapsed on delete), so
    /// "the other side has *anything* under this same octet path" is
    /// already sufficient to prove overlap.
    pub(crate) fn overlaps_with(&self, other: &StrideNode<V>) -> bool {
        if self
            .prefixes
            .iter()
            .any(|(i, _)| other.prefixes.iter().any(|(j, _)| idx_overlaps(i, j)))
        {
            return true;
        }

        // An inner prefix on either side already contains every octet in
        // its range; if the other side has anything at all (child, leaf or
        // fringe) under any octet in that range, the two nodes overlap.
        let any_entry_in_range = |node: &StrideNode<V>, idx: u16| {
            let (first, last) = idx_to_range(idx as u8);
            (first..=last).any(|o| {
                node.children.is_set(o as u16) || node.leaves.is_set(o as u16) || node.fringes.is_set(o as u16)
            })
        };
        if self.prefixes.iter().any(|(i, _)| any_entry_in_range(other, i)) {
            return true;
        }
        if other.prefixes.iter().any(|(j, _)| any_entry_in_range(self, j)) {
            return true;
        }

        for octet in 0u16..256 {
            let a_child = self.children.get(octet);
            let b_child = other.children.get(octet);
            let a_leaf = self.leaves.get(octet);
            let b_leaf = other.leaves.get(octet);
            let a_fringe = self.fringes.is_set(octet);
            let b_fringe = other.fringes.is_set(octet);

            if let (Some(ac), Some(bc)) = (a_child, b_child) {
                if ac.overlaps_with(bc) {
                    return true;
                }
            }
            if let (Some(al), Some(bl)) = (a_leaf, b_leaf) {
                if al.prefix.contains(&bl.prefix.addr) || bl.prefix.contains(&al.prefix.addr) {
                    return true;
                }
            }
            if a_fringe && b_fringe {
                return true;
            }
            if a_leaf.is_some() && b_child.is_some() {
                return true;
            }
            if b_leaf.is_some() && a_child.is_some() {
                return true;
            }
            if a_fringe && (b_child.is_some() || b_leaf.is_some()) {
                return true;
            }
            if b_fringe && (a_child.is_some() || a_leaf.is_some()) {
                return true;
            }
        }
        false
    }
}
