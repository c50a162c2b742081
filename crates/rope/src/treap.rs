//! The implicit treap engine.
//!
//! Nodes are ordered by position rather than by a stored key: a node's
//! index is the number of nodes in front of it, recovered on the way
//! down from the cached subtree sizes. Balance comes from the random
//! priorities, which form a max-heap; the expected height is
//! `O(log n)` but nothing bounds it in the worst case.
//!
//! The free functions below work on [Link]s and take their inputs by
//! value whenever the structure is rearranged, so a subtree is never
//! reachable from two places at once. [Treap] owns a root together with
//! its [Priorities] and performs the bounds checks.

use crate::error::{Error, Operation, Result};
use crate::iter::{IntoIter, Iter};
use crate::node::{size, Link, Node};
use crate::priority::Priorities;
use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// Cuts a tree into its first `k` elements and the rest
///
/// `k` past the end puts everything on the left.
pub(crate) fn split<T>(link: Link<T>, k: usize) -> (Link<T>, Link<T>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    let left_size = size(&node.left);
    if left_size >= k {
        let (left, right) = split(node.left.take(), k);
        node.left = right;
        node.update();
        (left, Some(node))
    } else {
        let (left, right) = split(node.right.take(), k - left_size - 1);
        node.right = left;
        node.update();
        (Some(node), right)
    }
}

/// Concatenates two trees, all of `lhs` before all of `rhs`
///
/// The root with the higher priority wins. On equal priorities the
/// right-hand root is taken.
pub(crate) fn merge<T>(lhs: Link<T>, rhs: Link<T>) -> Link<T> {
    match (lhs, rhs) {
        (None, rhs) => rhs,
        (lhs, None) => lhs,
        (Some(mut lhs), Some(mut rhs)) => {
            if lhs.priority > rhs.priority {
                lhs.right = merge(lhs.right.take(), Some(rhs));
                lhs.update();
                Some(lhs)
            } else {
                rhs.left = merge(Some(lhs), rhs.left.take());
                rhs.update();
                Some(rhs)
            }
        }
    }
}

/// Places `node` at `pos`; the caller guarantees `pos <= size(link)`
pub(crate) fn insert<T>(link: Link<T>, pos: usize, node: Box<Node<T>>) -> Link<T> {
    debug_assert!(pos <= size(&link));
    let (left, right) = split(link, pos);
    merge(merge(left, Some(node)), right)
}

/// Cuts `[pos, pos + count)` out of a tree, returning `(rest, removed)`
///
/// The caller guarantees the range lies inside the tree.
pub(crate) fn erase<T>(link: Link<T>, pos: usize, count: usize) -> (Link<T>, Link<T>) {
    debug_assert!(pos + count <= size(&link));
    let (head, right) = split(link, pos + count);
    let (left, removed) = split(head, pos);
    (merge(left, right), removed)
}

pub(crate) fn lookup<T>(link: &Link<T>, mut pos: usize) -> Option<&T> {
    let mut current = link.as_deref();
    while let Some(node) = current {
        let left_size = size(&node.left);
        match pos.cmp(&left_size) {
            Ordering::Equal => return Some(&node.value),
            Ordering::Less => current = node.left.as_deref(),
            Ordering::Greater => {
                pos -= left_size + 1;
                current = node.right.as_deref();
            }
        }
    }
    None
}

pub(crate) fn lookup_mut<T>(link: &mut Link<T>, mut pos: usize) -> Option<&mut T> {
    let mut current = link.as_deref_mut();
    while let Some(node) = current {
        let left_size = size(&node.left);
        match pos.cmp(&left_size) {
            Ordering::Equal => return Some(&mut node.value),
            Ordering::Less => current = node.left.as_deref_mut(),
            Ordering::Greater => {
                pos -= left_size + 1;
                current = node.right.as_deref_mut();
            }
        }
    }
    None
}

/// Deep-copies a tree, drawing every priority afresh from `priorities`
///
/// Only the element sequence is preserved. The copy is rebuilt through
/// [merge], so its shape follows the new priorities and is unrelated to
/// the shape of the source.
pub(crate) fn copy<T: Clone>(priorities: &mut Priorities, from: &Link<T>) -> Link<T> {
    let from = from.as_ref()?;
    let left = copy(priorities, &from.left);
    let node = Node::new(priorities.draw(), from.value.clone());
    let right = copy(priorities, &from.right);
    merge(merge(left, Some(node)), right)
}

/// Destroys a tree in post-order, children before their parent
pub(crate) fn clear<T>(link: &mut Link<T>) {
    if let Some(mut node) = link.take() {
        clear(&mut node.left);
        clear(&mut node.right);
    }
}

pub(crate) fn height<T>(link: &Link<T>) -> usize {
    link.as_ref()
        .map_or(0, |node| 1 + height(&node.left).max(height(&node.right)))
}

/// A sequence stored as an implicit treap
///
/// This is the engine behind [crate::Rope]; it can be used on its own
/// when the sequence-level conveniences are not needed.
pub struct Treap<T> {
    root: Link<T>,
    priorities: Priorities,
}

impl<T> Treap<T> {
    /// Creates an empty treap with a generator seeded from the thread-local RNG
    pub fn new() -> Self {
        Self::with_priorities(Priorities::new())
    }

    /// Creates an empty treap drawing priorities from `priorities`
    pub fn with_priorities(priorities: Priorities) -> Self {
        Self {
            root: None,
            priorities,
        }
    }

    /// Creates an empty treap whose generator is seeded from this one
    pub(crate) fn detached(&mut self) -> Self {
        Self::with_priorities(self.priorities.spawn())
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        size(&self.root)
    }

    /// Returns true if there are no elements
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree, 0 when empty
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Returns the element at `pos`
    pub fn get(&self, pos: usize) -> Result<&T> {
        lookup(&self.root, pos).ok_or_else(|| Error::out_of_range(Operation::Get, pos, self.len()))
    }

    /// Returns the element at `pos` mutably
    pub fn get_mut(&mut self, pos: usize) -> Result<&mut T> {
        let len = self.len();
        lookup_mut(&mut self.root, pos).ok_or(Error::out_of_range(Operation::Get, pos, len))
    }

    /// Inserts `value` before position `pos`; `pos == len()` appends
    pub fn insert(&mut self, pos: usize, value: T) -> Result<()> {
        let len = self.len();
        if pos > len {
            return Err(Error::out_of_range(Operation::Insert, pos, len));
        }
        let node = Node::new(self.priorities.draw(), value);
        self.root = insert(self.root.take(), pos, node);
        Ok(())
    }

    /// Appends `value`
    pub fn push_back(&mut self, value: T) {
        let node = Node::new(self.priorities.draw(), value);
        self.root = merge(self.root.take(), Some(node));
    }

    /// Prepends `value`
    pub fn push_front(&mut self, value: T) {
        let node = Node::new(self.priorities.draw(), value);
        self.root = merge(Some(node), self.root.take());
    }

    /// Removes `count` elements starting at `pos`
    pub fn erase(&mut self, pos: usize, count: usize) -> Result<()> {
        let mut removed = self.cut(pos, count)?;
        clear(&mut removed);
        Ok(())
    }

    /// Removes and returns the element at `pos`
    pub fn remove(&mut self, pos: usize) -> Result<T> {
        let len = self.len();
        match self.cut(pos, 1)? {
            Some(node) => {
                let Node { value, .. } = *node;
                Ok(value)
            }
            None => Err(Error::out_of_range(Operation::Erase, pos, len)),
        }
    }

    fn cut(&mut self, pos: usize, count: usize) -> Result<Link<T>> {
        let len = self.len();
        let end = pos.checked_add(count).unwrap_or(usize::MAX);
        if end > len {
            return Err(Error::out_of_range(Operation::Erase, end, len));
        }
        let (rest, removed) = erase(self.root.take(), pos, count);
        self.root = rest;
        Ok(removed)
    }

    /// Splits into the first `k` elements and the rest, consuming `self`
    ///
    /// The left part keeps this treap's generator, the right part gets a
    /// new one seeded from it. A `k` past the end leaves the right part
    /// empty.
    pub fn split(mut self, k: usize) -> (Self, Self) {
        let (left, right) = split(self.root.take(), k);
        let right = Self {
            root: right,
            priorities: self.priorities.spawn(),
        };
        self.root = left;
        (self, right)
    }

    /// Keeps the first `k` elements and returns the rest
    pub fn split_off(&mut self, k: usize) -> Result<Self> {
        let len = self.len();
        if k > len {
            return Err(Error::out_of_range(Operation::Split, k, len));
        }
        let (left, right) = split(self.root.take(), k);
        self.root = left;
        Ok(Self {
            root: right,
            priorities: self.priorities.spawn(),
        })
    }

    /// Moves every element of `other` to the end of `self`
    ///
    /// `other` is left empty and stays usable.
    pub fn append(&mut self, other: &mut Self) {
        self.root = merge(self.root.take(), other.root.take());
    }

    /// Moves every element of `other` in front of position `pos`
    ///
    /// The nodes of `other` are relinked, not copied.
    pub fn splice(&mut self, pos: usize, mut other: Self) -> Result<()> {
        let len = self.len();
        if pos > len {
            return Err(Error::out_of_range(Operation::Insert, pos, len));
        }
        let (left, right) = split(self.root.take(), pos);
        self.root = merge(merge(left, other.root.take()), right);
        Ok(())
    }

    /// Removes every element
    pub fn clear(&mut self) {
        clear(&mut self.root);
    }

    /// Moves the contents out, leaving an empty treap behind
    ///
    /// The returned treap takes over the generator; `self` continues
    /// with a new one seeded from it.
    pub fn take(&mut self) -> Self {
        let spawned = self.priorities.spawn();
        let priorities = mem::replace(&mut self.priorities, spawned);
        Self {
            root: self.root.take(),
            priorities,
        }
    }

    /// Returns an in-order iterator over the elements
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root, 0, self.len())
    }

    /// Returns an in-order iterator over the elements in `range`
    pub fn range(&self, range: std::ops::Range<usize>) -> Result<Iter<'_, T>> {
        let len = self.len();
        if range.end > len {
            return Err(Error::out_of_range(Operation::Get, range.end, len));
        }
        if range.start > range.end {
            return Err(Error::out_of_range(Operation::Get, range.start, len));
        }
        Ok(Iter::new(&self.root, range.start, range.end - range.start))
    }
}

impl<T> Default for Treap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Treap<T> {
    fn drop(&mut self) {
        clear(&mut self.root);
    }
}

impl<T: Clone> Clone for Treap<T> {
    /// Copies the elements; priorities are drawn anew from a forked generator
    fn clone(&self) -> Self {
        let mut priorities = self.priorities.fork();
        let root = copy(&mut priorities, &self.root);
        Self { root, priorities }
    }

    /// Replaces the contents with a copy of `source`, drawing priorities
    /// from this treap's own generator
    fn clone_from(&mut self, source: &Self) {
        clear(&mut self.root);
        self.root = copy(&mut self.priorities, &source.root);
    }
}

impl<T> IntoIterator for Treap<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter::new(self.root.take())
    }
}

impl<'a, T> IntoIterator for &'a Treap<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Treap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<T> Treap<T> {
    /// Checks cached sizes and heap order, returning the element count
    pub(crate) fn is_valid(&self) -> usize {
        fn verify<T>(link: &Link<T>, bound: Option<u64>) -> usize {
            let Some(node) = link else {
                return 0;
            };
            if let Some(bound) = bound {
                assert!(node.priority <= bound, "heap order on priorities has been violated!");
            }
            let left = verify(&node.left, Some(node.priority));
            let right = verify(&node.right, Some(node.priority));
            assert_eq!(1 + left + right, node.size, "cached subtree size is stale");
            node.size
        }
        verify(&self.root, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn seeded(values: &[char]) -> Treap<char> {
        let mut treap = Treap::with_priorities(Priorities::with_seed(0));
        for &c in values {
            treap.push_back(c);
        }
        treap
    }

    fn gather(treap: &Treap<char>) -> String {
        treap.iter().collect()
    }

    #[test]
    fn test_split_merge() {
        let treap = seeded(&['h', 'e', 'l', 'l', 'o']);
        for k in 0..=5 {
            let (left, right) = treap.clone().split(k);
            left.is_valid();
            right.is_valid();
            assert_eq!(&"hello"[..k], gather(&left));
            assert_eq!(&"hello"[k..], gather(&right));
            let mut joined = left;
            let mut right = right;
            joined.append(&mut right);
            assert!(right.is_empty());
            assert_eq!("hello", gather(&joined));
            joined.is_valid();
        }
        let (left, right) = treap.split(9);
        assert_eq!("hello", gather(&left));
        assert!(right.is_empty());
    }

    #[test]
    fn test_merge_tie() {
        let mut lhs = Some(Node::new(3, 'a'));
        let rhs = Some(Node::new(3, 'b'));
        let root = merge(lhs.take(), rhs);
        let root = root.unwrap();
        assert_eq!('b', root.value);
        assert_eq!(Some('a'), root.left.as_ref().map(|n| n.value));
        assert_eq!(2, root.size);
    }

    #[test]
    fn test_insert_erase() {
        let mut treap = seeded(&['b', 'c']);
        treap.insert(0, 'X').unwrap();
        assert_eq!("Xbc", gather(&treap));
        treap.insert(3, 'Y').unwrap();
        assert_eq!("XbcY", gather(&treap));
        assert_eq!(
            Err(Error::out_of_range(Operation::Insert, 6, 4)),
            treap.insert(6, 'Z'),
        );

        let mut treap = seeded(&['a', 'b', 'c', 'd', 'e', 'f']);
        treap.erase(1, 2).unwrap();
        assert_eq!("adef", gather(&treap));
        assert_eq!(4, treap.len());
        assert!(treap.erase(4, 1).is_err());
        assert!(treap.erase(1, usize::MAX).is_err());
        assert_eq!("adef", gather(&treap));
        treap.erase(4, 0).unwrap();
        assert_eq!(Ok('d'), treap.remove(1));
        assert_eq!("aef", gather(&treap));
        treap.is_valid();
    }

    #[test]
    fn test_lookup() {
        let mut treap = seeded(&['a', 'b', 'c', 'd', 'e']);
        for (i, c) in "abcde".chars().enumerate() {
            assert_eq!(Ok(&c), treap.get(i));
        }
        assert_eq!(Err(Error::out_of_range(Operation::Get, 5, 5)), treap.get(5));
        *treap.get_mut(2).unwrap() = 'C';
        assert_eq!("abCde", gather(&treap));
        assert!(treap.get_mut(5).is_err());
    }

    #[test]
    fn test_copy() {
        let treap = seeded(&['r', 'o', 'p', 'e']);
        let copy = treap.clone();
        copy.is_valid();
        assert_eq!(gather(&treap), gather(&copy));

        let mut target = seeded(&['x']);
        target.clone_from(&treap);
        target.is_valid();
        assert_eq!("rope", gather(&target));
    }

    #[test]
    fn test_split_generators() {
        let treap = seeded(&['a', 'b', 'c', 'd', 'e', 'f']);
        let (left, mut right) = treap.split(4);
        let (_, mut middle) = left.split(2);
        assert_ne!(right.priorities.draw(), middle.priorities.draw());

        let mut head = seeded(&['a', 'b', 'c', 'd']);
        let mut first = head.split_off(3).unwrap();
        let mut second = head.split_off(1).unwrap();
        assert_ne!(first.priorities.draw(), second.priorities.draw());
    }

    #[test]
    fn test_clones_balanced() {
        let base: Treap<u32> = Treap::with_priorities(Priorities::with_seed(5));
        let mut whole = Treap::with_priorities(Priorities::with_seed(6));
        for i in 0..4000 {
            let mut piece = base.clone();
            piece.push_back(i);
            whole.append(&mut piece);
        }
        assert_eq!(4000, whole.is_valid());
        assert!(whole.iter().copied().eq(0..4000));
        let log2 = (whole.len() as f64).log2();
        assert!((whole.height() as f64) < 4.0 * log2, "height {} for {} nodes", whole.height(), whole.len());
    }

    #[test]
    fn test_range() {
        let treap = seeded(&['a', 'b', 'c']);
        assert_eq!("bc", treap.range(1..3).unwrap().collect::<String>());
        assert_eq!(Some(Error::out_of_range(Operation::Get, 4, 3)), treap.range(1..4).err());
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = treap.range(2..1).err();
        assert_eq!(Some(Error::out_of_range(Operation::Get, 2, 3)), reversed);
    }

    #[test]
    fn test_take() {
        let mut treap = seeded(&['a', 'b']);
        let moved = treap.take();
        assert_eq!("ab", gather(&moved));
        assert!(treap.is_empty());
        treap.push_back('z');
        assert_eq!("z", gather(&treap));
    }

    #[test]
    fn test_drop_order() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Loud(usize, Rc<RefCell<Vec<usize>>>);
        impl Drop for Loud {
            fn drop(&mut self) {
                self.1.borrow_mut().push(self.0);
            }
        }

        let dropped = Rc::new(RefCell::new(vec![]));
        let mut treap = Treap::with_priorities(Priorities::with_seed(1));
        for i in 0..64 {
            treap.push_back(Loud(i, dropped.clone()));
        }
        treap.erase(10, 20).unwrap();
        assert_eq!(20, dropped.borrow().len());
        drop(treap);
        let mut all = dropped.borrow().clone();
        all.sort();
        assert_eq!((0..64).collect::<Vec<_>>(), all);
    }

    #[test]
    fn test_many_insert_some_delete() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut treap = Treap::with_priorities(Priorities::with_seed(0));
        let mut expected: Vec<u32> = vec![];
        for i in 0..20000 {
            if expected.is_empty() || rng.random_bool(0.6) {
                let pos = rng.random_range(0..=expected.len());
                expected.insert(pos, i);
                treap.insert(pos, i).unwrap();
            } else {
                let pos = rng.random_range(0..expected.len());
                let count = rng.random_range(0..=(expected.len() - pos).min(8));
                expected.drain(pos..pos + count);
                treap.erase(pos, count).unwrap();
            }
            if i % 1000 == 0 {
                assert_eq!(expected.len(), treap.is_valid());
                assert!(treap.iter().eq(expected.iter()));
            }
        }
        assert_eq!(expected.len(), treap.is_valid());
        assert!(treap.iter().copied().eq(expected.iter().copied()));
    }

    #[test]
    fn test_expected_height() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for seed in 0..8 {
            let mut treap = Treap::with_priorities(Priorities::with_seed(seed));
            for i in 0..4096u32 {
                let pos = rng.random_range(0..=treap.len());
                treap.insert(pos, i).unwrap();
            }
            for _ in 0..1024 {
                let pos = rng.random_range(0..treap.len());
                treap.remove(pos).unwrap();
            }
            let log2 = (treap.len() as f64).log2();
            // heights concentrate near 3 * log2(n)
            assert!((treap.height() as f64) < 4.0 * log2, "height {} for {} nodes", treap.height(), treap.len());
        }
    }
}
