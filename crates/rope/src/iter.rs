use crate::node::{size, Link, Node};
use std::iter::FusedIterator;

/// Borrowing in-order iterator
///
/// Walks the tree with an explicit stack holding the pending ancestors,
/// so each step is amortized `O(1)` and no recursion is involved.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    /// Starts at position `start` and yields at most `count` elements
    pub(crate) fn new(root: &'a Link<T>, start: usize, count: usize) -> Self {
        let mut stack = vec![];
        let mut pos = start;
        let mut current = root.as_deref();
        while let Some(node) = current {
            let left_size = size(&node.left);
            if pos < left_size {
                stack.push(node);
                current = node.left.as_deref();
            } else if pos == left_size {
                stack.push(node);
                break;
            } else {
                pos -= left_size + 1;
                current = node.right.as_deref();
            }
        }
        let remaining = if stack.is_empty() { 0 } else { count };
        Self { stack, remaining }
    }

    fn push_left(&mut self, mut link: Option<&'a Node<T>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

/// Owning in-order iterator
pub struct IntoIter<T> {
    stack: Vec<Box<Node<T>>>,
    remaining: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(root: Link<T>) -> Self {
        let mut iter = Self {
            stack: vec![],
            remaining: size(&root),
        };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut link: Link<T>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.push_left(node.right.take());
        self.remaining -= 1;
        let Node { value, .. } = *node;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
