//! Fixed-length interest bitsets

use hermes_core::Id;

const WORD_BITS: usize = u64::BITS as usize;

/// Set of entity IDs an extension wants to observe
///
/// Sized once from a reference table's count; membership is an O(1) bit test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestSet {
    words: Vec<u64>,
    len: usize,
}

impl InterestSet {
    /// Empty set over IDs `0..len`
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Add `id`; `false` if it is outside `0..len`
    pub fn insert(&mut self, id: Id) -> bool {
        let index = id as usize;
        if index >= self.len {
            return false;
        }
        self.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
        true
    }

    pub fn remove(&mut self, id: Id) {
        let index = id as usize;
        if index < self.len {
            self.words[index / WORD_BITS] &= !(1 << (index % WORD_BITS));
        }
    }

    /// Membership test; out-of-range IDs are never members
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        let index = id as usize;
        index < self.len && self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Size of the ID space
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of IDs in the set
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Member IDs in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        (0..self.len as Id).filter(|id| self.contains(*id))
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = InterestSet::new(130);
        assert!(set.insert(0));
        assert!(set.insert(64));
        assert!(set.insert(129));
        assert!(!set.insert(130));

        assert!(set.contains(0));
        assert!(set.contains(64));
        assert!(set.contains(129));
        assert!(!set.contains(1));
        assert!(!set.contains(130));
        assert!(!set.contains(Id::MAX));
        assert_eq!(set.count(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 64, 129]);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut set = InterestSet::new(10);
        set.insert(3);
        set.insert(4);
        set.remove(3);
        set.remove(99);
        assert!(!set.contains(3));
        assert_eq!(set.count(), 1);
        set.clear();
        assert_eq!(set.count(), 0);
        assert_eq!(set.len(), 10);
    }

    #[test]
    fn test_empty_space() {
        let mut set = InterestSet::new(0);
        assert!(set.is_empty());
        assert!(!set.insert(0));
        assert!(!set.contains(0));
    }
}
