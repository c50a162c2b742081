/// An owned, possibly empty subtree
///
/// Ownership is strictly tree-shaped: a node is reachable from
/// exactly one slot, and moving a subtree means moving its box.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

pub(crate) struct Node<T> {
    /// Heap key, fixed at creation
    pub priority: u64,
    pub value: T,
    pub left: Link<T>,
    pub right: Link<T>,
    /// Number of nodes in the subtree rooted here
    pub size: usize,
}

impl<T> Node<T> {
    pub fn new(priority: u64, value: T) -> Box<Self> {
        Box::new(Self {
            priority,
            value,
            left: None,
            right: None,
            size: 1,
        })
    }

    /// Recomputes the cached size after a child slot changed
    ///
    /// Must run before any ancestor reads this node's size.
    pub fn update(&mut self) {
        self.size = 1 + size(&self.left) + size(&self.right);
    }
}

/// Number of elements in a subtree, 0 for an empty one
pub(crate) fn size<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update() {
        let mut root = Node::new(10, 'b');
        assert_eq!(1, root.size);
        root.left = Some(Node::new(5, 'a'));
        root.update();
        assert_eq!(2, root.size);
        let mut right = Node::new(7, 'd');
        right.left = Some(Node::new(1, 'c'));
        right.update();
        root.right = Some(right);
        root.update();
        assert_eq!(4, root.size);
        assert_eq!(4, size(&Some(root)));
        assert_eq!(0, size::<char>(&None));
    }
}
