//! Identity → node lookup for one tree.

use rapidhash::RapidHashMap as HashMap;

use crate::error::{ReconcileError, Side};
use crate::traversal::{Direction, Order, traverse};
use crate::tree::TreeNode;
use crate::trace;

/// Where a node sits in its tree.
pub struct Entry<N: TreeNode> {
    /// Handle to the node.
    pub node: N,
    /// Identity of the parent, `None` for the root.
    pub parent: Option<N::Identity>,
    /// Index among the parent's children (0 for the root).
    pub position: usize,
}

/// Maps every identity of one tree to its [`Entry`].
///
/// Two indices built from two trees share no storage; they are correlated
/// only by comparing keys.
pub struct IdentityIndex<N: TreeNode> {
    entries: HashMap<N::Identity, Entry<N>>,
}

impl<N: TreeNode> IdentityIndex<N> {
    /// Index the tree rooted at `root` (absent → empty index).
    pub fn build(root: Option<N>, side: Side) -> Result<Self, ReconcileError<N::Identity>> {
        Self::build_with_limit(root, side, None)
    }

    /// Like [`IdentityIndex::build`], failing once more than `limit` nodes are seen.
    pub fn build_with_limit(
        root: Option<N>,
        side: Side,
        limit: Option<usize>,
    ) -> Result<Self, ReconcileError<N::Identity>> {
        let mut entries: HashMap<N::Identity, Entry<N>> = HashMap::default();
        // Parent links are recorded when the parent is visited; pre-order
        // guarantees that happens before the child itself comes up.
        let mut links: HashMap<N::Identity, (N::Identity, usize)> = HashMap::default();

        for node in traverse(root, Direction::LeftToRight, Order::Pre) {
            if let Some(limit) = limit
                && entries.len() >= limit
            {
                return Err(ReconcileError::NodeLimitExceeded { side, limit });
            }

            let identity = node.identity();
            if entries.contains_key(&identity) {
                return Err(ReconcileError::DuplicateIdentity { identity, side });
            }

            let (parent, position) = match links.remove(&identity) {
                Some((parent, position)) => (Some(parent), position),
                None => (None, 0),
            };
            for (position, child) in node.children().enumerate() {
                links.insert(child.identity(), (identity.clone(), position));
            }

            entries.insert(
                identity,
                Entry {
                    node,
                    parent,
                    position,
                },
            );
        }

        trace!(%side, nodes = entries.len(), "identity index built");
        Ok(Self { entries })
    }

    /// Look up an identity.
    pub fn get(&self, identity: &N::Identity) -> Option<&Entry<N>> {
        self.entries.get(identity)
    }

    /// Whether the tree contains `identity`.
    pub fn contains(&self, identity: &N::Identity) -> bool {
        self.entries.contains_key(identity)
    }

    /// Parent identity of `identity`, if it is present and not the root.
    pub fn parent_of(&self, identity: &N::Identity) -> Option<&N::Identity> {
        self.entries.get(identity)?.parent.as_ref()
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the indexed tree was absent.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
