use crate::component::ComponentId;
use bitvec::vec::BitVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;

/// The exact set of component ids an archetype stores.
///
/// Bit `i` is set when component id `i` is a member. Trailing zero bits are
/// always trimmed, so two sets holding the same ids compare and hash equal no
/// matter the order they were built in.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct SignatureSet {
    bits: BitVec,
}

impl SignatureSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = ComponentId>) -> Self {
        let mut set = Self::empty();
        for id in ids {
            set.insert(id);
        }
        set
    }

    pub fn insert(&mut self, id: ComponentId) {
        if id >= self.bits.len() {
            self.bits.resize(id + 1, false);
        }
        self.bits.set(id, true);
    }

    pub fn remove(&mut self, id: ComponentId) {
        if id < self.bits.len() {
            self.bits.set(id, false);
            let len = self.bits.last_one().map_or(0, |last| last + 1);
            self.bits.truncate(len);
        }
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        id < self.bits.len() && self.bits[id]
    }

    pub fn with(&self, id: ComponentId) -> Self {
        let mut set = self.clone();
        set.insert(id);
        set
    }

    pub fn without(&self, id: ComponentId) -> Self {
        let mut set = self.clone();
        set.remove(id);
        set
    }

    pub fn union(&self, other: &Self) -> Self {
        let max_len = self.bits.len().max(other.bits.len());
        let mut bits = self.bits.clone();
        bits.resize(max_len, false);
        for id in other.bits.iter_ones() {
            bits.set(id, true);
        }

        Self { bits }
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        if self.bits.len() > other.bits.len() {
            return false;
        }
        self.bits.iter_ones().all(|id| other.bits[id])
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Member ids in ascending order. Archetype columns follow this order.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.bits.iter_ones()
    }
}

impl ops::BitOr for SignatureSet {
    type Output = Self;

    fn bitor(self, other: Self) -> Self::Output {
        self.union(&other)
    }
}

impl Hash for SignatureSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.len().hash(state);
        for id in self.bits.iter_ones() {
            id.hash(state);
        }
    }
}

impl fmt::Debug for SignatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bits.iter_ones()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(set: &SignatureSet) -> u64 {
        let mut hasher = DefaultHasher::new();
        set.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn order_does_not_matter() {
        let a = SignatureSet::from_ids([3, 0, 5]);
        let b = SignatureSet::from_ids([5, 3, 0, 3]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(a.ids().collect::<Vec<_>>(), vec![0, 3, 5]);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn removing_the_highest_id_trims_the_tail() {
        let grown = SignatureSet::from_ids([1, 7]).without(7);
        let plain = SignatureSet::from_ids([1]);
        assert_eq!(grown, plain);
        assert_eq!(hash_of(&grown), hash_of(&plain));

        assert_eq!(SignatureSet::from_ids([2]).without(2), SignatureSet::empty());
        assert!(SignatureSet::from_ids([2]).without(2).is_empty());
    }

    #[test]
    fn subset_and_union() {
        let small = SignatureSet::from_ids([1]);
        let big = SignatureSet::from_ids([1, 4]);
        assert!(small.is_subset(&big));
        assert!(!big.is_subset(&small));
        assert!(SignatureSet::empty().is_subset(&small));
        assert_eq!(small.clone() | SignatureSet::from_ids([4]), big);
        assert!(big.contains(4));
        assert!(!big.contains(2));
        assert!(!big.contains(100));
    }
}
