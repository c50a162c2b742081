use crate::error::{Error, Operation, Result};
use crate::iter::{IntoIter, Iter};
use crate::priority::Priorities;
use crate::treap::Treap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut, Range};

/// A sequence with logarithmic positional editing
///
/// Every operation is translated into one or two split/merge calls on the
/// underlying [Treap], giving expected `O(log n)` insertion, removal,
/// indexing, splitting and concatenation at any position.
///
/// Operations that move content out of a rope (splitting, [Rope::concat],
/// [std::mem::take]) always leave the donor as a valid empty rope.
pub struct Rope<T> {
    treap: Treap<T>,
}

impl<T> Rope<T> {
    /// Creates an empty rope seeded from the thread-local RNG
    pub fn new() -> Self {
        Self { treap: Treap::new() }
    }

    /// Creates an empty rope whose priorities are reproducible from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_priorities(Priorities::with_seed(seed))
    }

    /// Creates an empty rope drawing priorities from `priorities`
    pub fn with_priorities(priorities: Priorities) -> Self {
        Self {
            treap: Treap::with_priorities(priorities),
        }
    }

    /// Creates an empty rope whose generator is seeded from this one
    pub(crate) fn detached(&mut self) -> Self {
        Self {
            treap: self.treap.detached(),
        }
    }

    /// Builds a rope out of the first `len` items of `values`
    ///
    /// Panics if `len > values.len()`.
    pub fn from_buffer(values: &[T], len: usize) -> Self
    where
        T: Clone,
    {
        values[..len].iter().cloned().collect()
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.treap.len()
    }

    /// Returns true if the rope holds no elements
    pub fn is_empty(&self) -> bool {
        self.treap.is_empty()
    }

    /// Returns the height of the underlying tree
    ///
    /// Expected to stay within a small constant factor of `log2(len)`.
    pub fn height(&self) -> usize {
        self.treap.height()
    }

    /// Returns the element at `pos`
    pub fn get(&self, pos: usize) -> Result<&T> {
        self.treap.get(pos)
    }

    /// Returns the element at `pos` mutably
    pub fn get_mut(&mut self, pos: usize) -> Result<&mut T> {
        self.treap.get_mut(pos)
    }

    /// Returns the first element
    pub fn first(&self) -> Option<&T> {
        self.treap.get(0).ok()
    }

    /// Returns the last element
    pub fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|pos| self.treap.get(pos).ok())
    }

    /// Inserts `value` before `pos`; `pos == len()` appends
    pub fn insert(&mut self, pos: usize, value: T) -> Result<()> {
        self.treap.insert(pos, value)
    }

    /// Appends `value`
    pub fn push_back(&mut self, value: T) {
        self.treap.push_back(value);
    }

    /// Prepends `value`
    pub fn push_front(&mut self, value: T) {
        self.treap.push_front(value);
    }

    /// Inserts copies of all elements of `other` before `pos`
    ///
    /// The elements are cloned one by one, so `other` is left untouched
    /// and no node is ever shared between the two ropes. This costs
    /// `O(m log(n + m))`; use [Rope::splice] when `other` can be consumed.
    pub fn insert_rope(&mut self, pos: usize, other: &Rope<T>) -> Result<()>
    where
        T: Clone,
    {
        let len = self.len();
        if pos > len {
            return Err(Error::out_of_range(Operation::Insert, pos, len));
        }
        for (offset, value) in other.iter().enumerate() {
            self.treap.insert(pos + offset, value.clone())?;
        }
        Ok(())
    }

    /// Inserts the items of `values` before `pos`, in order
    ///
    /// The items are gathered into a separate rope first and spliced in
    /// with a single split, so nothing is inserted when `pos` is out of
    /// range.
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, pos: usize, values: I) -> Result<()> {
        let len = self.len();
        if pos > len {
            return Err(Error::out_of_range(Operation::Insert, pos, len));
        }
        let mut inserted = self.detached();
        inserted.extend(values);
        self.splice(pos, inserted)
    }

    /// Moves all elements of `other` in front of `pos` in `O(log n)`
    pub fn splice(&mut self, pos: usize, other: Rope<T>) -> Result<()> {
        log::trace!("splicing {} elements at {} into a rope of {}", other.len(), pos, self.len());
        self.treap.splice(pos, other.treap)
    }

    /// Removes the element at `pos`
    pub fn erase(&mut self, pos: usize) -> Result<()> {
        self.treap.erase(pos, 1)
    }

    /// Removes `count` elements starting at `pos`
    pub fn erase_range(&mut self, pos: usize, count: usize) -> Result<()> {
        log::trace!("erasing {} elements at {} from a rope of {}", count, pos, self.len());
        self.treap.erase(pos, count)
    }

    /// Removes and returns the element at `pos`
    pub fn remove(&mut self, pos: usize) -> Result<T> {
        self.treap.remove(pos)
    }

    /// Splits into the first `k` elements and the rest, consuming the rope
    ///
    /// With `k > len()` the whole content ends up on the left.
    pub fn split(self, k: usize) -> (Rope<T>, Rope<T>) {
        log::trace!("splitting a rope of {} at {}", self.len(), k);
        let (left, right) = self.treap.split(k);
        (Rope { treap: left }, Rope { treap: right })
    }

    /// Keeps the first `k` elements and returns the rest as a new rope
    pub fn split_off(&mut self, k: usize) -> Result<Rope<T>> {
        log::trace!("splitting off a rope of {} at {}", self.len(), k);
        let treap = self.treap.split_off(k)?;
        Ok(Rope { treap })
    }

    /// Appends the content of `other`, leaving `other` empty
    pub fn concat(&mut self, other: &mut Rope<T>) {
        log::trace!("concatenating ropes of {} and {}", self.len(), other.len());
        self.treap.append(&mut other.treap);
    }

    /// Moves the content out, leaving an empty rope behind
    ///
    /// Unlike [std::mem::take], the returned rope keeps this rope's
    /// generator and `self` continues with one seeded from it, so seeded
    /// ropes stay reproducible.
    pub fn take(&mut self) -> Rope<T> {
        Rope {
            treap: self.treap.take(),
        }
    }

    /// Removes every element
    pub fn clear(&mut self) {
        log::trace!("clearing a rope of {}", self.len());
        self.treap.clear();
    }

    /// Returns an in-order iterator over the elements
    pub fn iter(&self) -> Iter<'_, T> {
        self.treap.iter()
    }

    /// Returns an iterator over the elements in `range`
    pub fn range(&self, range: Range<usize>) -> Result<Iter<'_, T>> {
        self.treap.range(range)
    }

    /// Copies the elements into a vector
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn is_valid(&self) {
        assert_eq!(self.len(), self.treap.is_valid());
    }
}

impl<T> Default for Rope<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Rope<T> {
    /// Copies the content; the copy has its own priorities, so its tree
    /// shape generally differs from the source
    fn clone(&self) -> Self {
        Self {
            treap: self.treap.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.treap.clone_from(&source.treap);
    }
}

impl<T> From<Vec<T>> for Rope<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Clone> From<&[T]> for Rope<T> {
    fn from(values: &[T]) -> Self {
        values.iter().cloned().collect()
    }
}

impl<T, const N: usize> From<[T; N]> for Rope<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T> FromIterator<T> for Rope<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut rope = Rope::new();
        rope.extend(iter);
        rope
    }
}

impl<T> Extend<T> for Rope<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Rope<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> IntoIterator for Rope<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.treap.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Rope<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Index<usize> for Rope<T> {
    type Output = T;

    fn index(&self, pos: usize) -> &T {
        match self.get(pos) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for Rope<T> {
    fn index_mut(&mut self, pos: usize) -> &mut T {
        match self.get_mut(pos) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: PartialEq> PartialEq for Rope<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Rope<T> {}

impl<T: PartialOrd> PartialOrd for Rope<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for Rope<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for Rope<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Rope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
