//! The read-only node contract the engine works against, plus an
//! arena-backed tree that implements it.

use core::fmt;
use core::hash::Hash;

use indextree::{Arena, NodeId};

/// A handle to a node of an ordered, identity-labeled tree.
///
/// Handles are cheap to copy (a reference, an arena index, ...). The engine
/// never mutates the tree behind a handle and never holds a handle past the
/// call that received it.
pub trait TreeNode: Copy {
    /// Token correlating nodes across two trees. Unique within one tree.
    type Identity: Clone + Eq + Hash + fmt::Debug;

    /// This node's identity.
    fn identity(&self) -> Self::Identity;

    /// This node's children, in order.
    fn children(&self) -> impl Iterator<Item = Self>;
}

/// An ordered tree of identities stored in an `indextree` arena.
///
/// Parent links are arena ids, so the tree owns every node exactly once.
#[derive(Debug, Clone)]
pub struct Tree<I> {
    arena: Arena<I>,
    /// The root node.
    pub root: NodeId,
}

impl<I> Tree<I> {
    /// Create a tree holding a single root node.
    pub fn new(root: I) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(root);
        Self { arena, root }
    }

    /// Append a child to `parent` and return the new node's id.
    pub fn add_child(&mut self, parent: NodeId, identity: I) -> NodeId {
        let child = self.arena.new_node(identity);
        parent.append(child, &mut self.arena);
        child
    }

    /// A handle to the root node.
    pub fn root(&self) -> NodeRef<'_, I> {
        self.get(self.root)
    }

    /// A handle to the node with arena id `id`.
    pub fn get(&self, id: NodeId) -> NodeRef<'_, I> {
        NodeRef { tree: self, id }
    }

    /// The identity stored at `id`.
    pub fn identity(&self, id: NodeId) -> &I {
        self.arena[id].get()
    }

    /// The parent of `id`, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent()
    }

    /// Child ids of `id`, in order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }
}

impl<I: fmt::Display> fmt::Display for Tree<I> {
    /// Writes the compact notation understood by [`crate::notation::parse`],
    /// e.g. `a(b(d,e),c)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use indextree::NodeEdge;

        for edge in self.root.traverse(&self.arena) {
            match edge {
                NodeEdge::Start(id) => {
                    if self.arena[id].previous_sibling().is_some() {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", self.arena[id].get())?;
                    if self.arena[id].first_child().is_some() {
                        f.write_str("(")?;
                    }
                }
                NodeEdge::End(id) => {
                    if self.arena[id].first_child().is_some() {
                        f.write_str(")")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// A borrowed handle to one node of a [`Tree`].
pub struct NodeRef<'a, I> {
    tree: &'a Tree<I>,
    id: NodeId,
}

impl<I> Clone for NodeRef<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for NodeRef<'_, I> {}

impl<'a, I> NodeRef<'a, I> {
    /// Arena id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Borrow the identity without cloning it.
    pub fn identity_ref(&self) -> &'a I {
        self.tree.identity(self.id)
    }

    /// The parent handle, if any.
    pub fn parent(&self) -> Option<NodeRef<'a, I>> {
        self.tree.parent(self.id).map(|id| self.tree.get(id))
    }
}

impl<I: fmt::Debug> fmt::Debug for NodeRef<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({:?})", self.identity_ref())
    }
}

impl<I> TreeNode for NodeRef<'_, I>
where
    I: Clone + Eq + Hash + fmt::Debug,
{
    type Identity = I;

    fn identity(&self) -> I {
        self.identity_ref().clone()
    }

    fn children(&self) -> impl Iterator<Item = Self> {
        let tree = self.tree;
        tree.children(self.id).map(move |id| tree.get(id))
    }
}
