//! Directional tree walks.
//!
//! A [`Traversal`] describes how to walk a tree (which way children are
//! visited, and whether a node is yielded before or after its children).
//! [`Traversal::traverse`] turns it into a lazy [`Traverse`] iterator. The
//! walk uses an explicit stack, so deep trees cost heap, not call stack.

use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::tree::TreeNode;

/// The order in which children are visited, applied at every level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// First child first.
    #[default]
    LeftToRight,
    /// Last child first.
    RightToLeft,
}

/// Whether a node is yielded before or after its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Parent, then children.
    #[default]
    Pre,
    /// Children, then parent.
    Post,
}

/// A reusable description of a tree walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Traversal {
    /// Sibling visiting order.
    pub direction: Direction,
    /// Parent/children emission order.
    pub order: Order,
}

impl Traversal {
    /// Create a traversal.
    pub const fn new(direction: Direction, order: Order) -> Self {
        Self { direction, order }
    }

    /// Walk the tree rooted at `root`. An absent root yields nothing.
    ///
    /// Every call starts from scratch; the returned iterator shares no state
    /// with earlier walks.
    pub fn traverse<N: TreeNode>(self, root: Option<N>) -> Traverse<N> {
        Traverse {
            stack: root.into_iter().map(Frame::Enter).collect(),
            traversal: self,
        }
    }
}

/// Walk the tree rooted at `root` in the given direction and order.
pub fn traverse<N: TreeNode>(root: Option<N>, direction: Direction, order: Order) -> Traverse<N> {
    Traversal::new(direction, order).traverse(root)
}

#[derive(Clone, Copy)]
enum Frame<N> {
    /// Not yet expanded.
    Enter(N),
    /// Children already pushed; yield on pop (post-order only).
    Exit(N),
}

/// Lazy iterator over the nodes of one walk.
#[derive(Clone)]
pub struct Traverse<N> {
    stack: Vec<Frame<N>>,
    traversal: Traversal,
}

impl<N: TreeNode> Traverse<N> {
    fn push_children(&mut self, node: N) {
        let children: SmallVec<[N; 8]> = node.children().collect();
        // The stack pops last-in first, so push in reverse of visiting order.
        match self.traversal.direction {
            Direction::LeftToRight => self
                .stack
                .extend(children.into_iter().rev().map(Frame::Enter)),
            Direction::RightToLeft => self.stack.extend(children.into_iter().map(Frame::Enter)),
        }
    }
}

impl<N: TreeNode> Iterator for Traverse<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        loop {
            match self.stack.pop()? {
                Frame::Enter(node) => match self.traversal.order {
                    Order::Pre => {
                        self.push_children(node);
                        return Some(node);
                    }
                    Order::Post => {
                        self.stack.push(Frame::Exit(node));
                        self.push_children(node);
                    }
                },
                Frame::Exit(node) => return Some(node),
            }
        }
    }
}

impl<N: TreeNode> FusedIterator for Traverse<N> {}
