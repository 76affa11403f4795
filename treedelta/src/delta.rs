//! Edit script generation.
//!
//! Every identity is classified by looking it up in both trees:
//!
//! - only in `to`: created. A `Create` is emitted unless some ancestor in `to`
//!   is created too, in which case the node arrives with that ancestor.
//! - only in `from`: deleted. A `Delete` is emitted unless some ancestor in
//!   `from` is deleted too.
//! - in both, same parent, and part of the parent's common child subsequence:
//!   untouched.
//! - in both otherwise: moved. `Detach` from the old parent (if any), `Attach`
//!   to the new one (if any).
//!
//! Operations are emitted in two passes, each an explicit worklist:
//!
//! 1. `from`, children before parents, right to left: `Detach` and `Delete`.
//!    A node that survives a deleted ancestor is detached before the ancestor
//!    goes. Under each parent the surviving children are handled before the
//!    departing ones, so removals nested in kept structure come first.
//! 2. `to`, parents before children, left to right: `Create` and `Attach`.
//!    A node is always in place before anything is inserted into it, and
//!    insertions into one parent come in ascending position, so applying each
//!    one at its final index in script order rebuilds `to` exactly. From a
//!    parent's first created child on, its stable children are visited first,
//!    so creations nested in kept structure come before creations at this
//!    level.

use core::fmt;
use core::hash::Hash;

use rapidhash::RapidHashSet as HashSet;
use smallvec::SmallVec;

use crate::config::ReconcileConfig;
use crate::error::{ReconcileError, Side};
use crate::index::IdentityIndex;
use crate::matcher::longest_common_subsequence;
use crate::operation::Operation;
use crate::traversal::{Direction, Order, traverse};
use crate::tree::TreeNode;
use crate::{debug, trace};

/// The edit script turning one tree into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeDelta<I> {
    operations: Vec<Operation<I>>,
}

impl<I> TreeDelta<I>
where
    I: Clone + Eq + Hash + fmt::Debug,
{
    /// Compute the script transforming `from` into `to`.
    ///
    /// `None` stands for an empty tree. The two trees may use different node
    /// types as long as they share an identity type.
    pub fn compute<F, T>(from: Option<F>, to: Option<T>) -> Result<Self, ReconcileError<I>>
    where
        F: TreeNode<Identity = I>,
        T: TreeNode<Identity = I>,
    {
        Self::compute_with_config(from, to, &ReconcileConfig::default())
    }

    /// Like [`TreeDelta::compute`], honouring `config`.
    pub fn compute_with_config<F, T>(
        from: Option<F>,
        to: Option<T>,
        config: &ReconcileConfig,
    ) -> Result<Self, ReconcileError<I>>
    where
        F: TreeNode<Identity = I>,
        T: TreeNode<Identity = I>,
    {
        let from_index = IdentityIndex::build_with_limit(from, Side::From, config.node_limit)?;
        let to_index = IdentityIndex::build_with_limit(to, Side::To, config.node_limit)?;
        debug!(
            nodes_from = from_index.len(),
            nodes_to = to_index.len(),
            "reconcile start"
        );

        let stable = align_siblings(&from_index, to);
        debug!(stable = stable.len(), "siblings aligned");

        let mut ops = Ops::new();

        // Pass 1: detach and delete, children before parents, right to left.
        let mut removals: Vec<Removal<F>> = from
            .into_iter()
            .map(|node| Removal::Enter {
                node,
                doomed: false,
            })
            .collect();
        while let Some(frame) = removals.pop() {
            match frame {
                Removal::Enter { node, doomed } => {
                    let identity = node.identity();
                    let absent = !to_index.contains(&identity);
                    removals.push(Removal::Exit {
                        identity,
                        doomed,
                        absent,
                    });

                    // Surviving children first, so removals nested in kept
                    // structure come before removals at this level.
                    let (survivors, leaving): (SmallVec<[F; 8]>, SmallVec<[F; 8]>) = node
                        .children()
                        .collect::<SmallVec<[F; 8]>>()
                        .into_iter()
                        .rev()
                        .partition(|child| to_index.contains(&child.identity()));
                    removals.extend(
                        survivors
                            .into_iter()
                            .chain(leaving)
                            .rev()
                            .map(|node| Removal::Enter {
                                node,
                                doomed: doomed || absent,
                            }),
                    );
                }
                Removal::Exit {
                    identity,
                    doomed,
                    absent,
                } => {
                    if absent {
                        // Cascade: a deleted ancestor takes this node with it.
                        if !doomed {
                            ops.push(Operation::Delete { identity });
                        }
                    } else if let Some(from_parent) = from_index.parent_of(&identity)
                        && is_moved(
                            &identity,
                            Some(from_parent),
                            to_index.parent_of(&identity),
                            &stable,
                        )
                    {
                        ops.push(Operation::Detach { identity });
                    }
                }
            }
        }
        debug!(ops = ops.inner.len(), "detach/delete pass done");

        // Pass 2: create and attach, parents before children, left to right.
        let mut insertions: Vec<Insertion<T>> = to
            .into_iter()
            .map(|node| Insertion {
                node,
                covered: false,
            })
            .collect();
        while let Some(Insertion { node, covered }) = insertions.pop() {
            let identity = node.identity();
            let Some(to_entry) = to_index.get(&identity) else {
                continue;
            };

            let is_new = !from_index.contains(&identity);
            if is_new {
                // Cascade: a created ancestor brings this node along.
                if !covered {
                    ops.push(Operation::Create {
                        identity,
                        parent: to_entry.parent.clone(),
                        position: to_entry.position,
                    });
                }
            } else if let Some(parent) = &to_entry.parent
                && is_moved(
                    &identity,
                    from_index.parent_of(&identity),
                    Some(parent),
                    &stable,
                )
            {
                ops.push(Operation::Attach {
                    identity,
                    parent: parent.clone(),
                    position: to_entry.position,
                });
            }

            let covered = covered || is_new;
            let children: SmallVec<[T; 8]> = node.children().collect();
            let order = insertion_order(&children, |child| {
                let identity = child.identity();
                if stable.contains(&identity) {
                    Slot::Stable
                } else if !covered && !from_index.contains(&identity) {
                    Slot::Create
                } else {
                    Slot::Other
                }
            });
            insertions.extend(
                order
                    .into_iter()
                    .rev()
                    .map(|node| Insertion { node, covered }),
            );
        }

        debug!(total_ops = ops.inner.len(), "reconcile done");
        Ok(Self {
            operations: ops.into_inner(),
        })
    }
}

impl<I> TreeDelta<I> {
    /// The operations, in application order.
    pub fn operations(&self) -> &[Operation<I>] {
        &self.operations
    }

    /// Iterate over the operations in application order.
    pub fn iter(&self) -> core::slice::Iter<'_, Operation<I>> {
        self.operations.iter()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True when the trees already agree.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Take the operations.
    pub fn into_operations(self) -> Vec<Operation<I>> {
        self.operations
    }
}

impl<I> IntoIterator for TreeDelta<I> {
    type Item = Operation<I>;
    type IntoIter = std::vec::IntoIter<Operation<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a, I> IntoIterator for &'a TreeDelta<I> {
    type Item = &'a Operation<I>;
    type IntoIter = core::slice::Iter<'a, Operation<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

impl<I: fmt::Display> fmt::Display for TreeDelta<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.operations {
            writeln!(f, "{op}")?;
        }
        Ok(())
    }
}

/// Collects operations, logging each one.
struct Ops<I> {
    inner: Vec<Operation<I>>,
}

impl<I: fmt::Debug> Ops<I> {
    fn new() -> Self {
        Self { inner: Vec::new() }
    }

    fn push(&mut self, op: Operation<I>) {
        debug!(?op, "emit");
        self.inner.push(op);
    }

    fn into_inner(self) -> Vec<Operation<I>> {
        self.inner
    }
}

/// Pending work for the removal pass.
enum Removal<N: TreeNode> {
    /// Schedule `node`'s children, then its own exit.
    Enter {
        node: N,
        /// Some ancestor is absent from `to`.
        doomed: bool,
    },
    /// Every descendant is done; decide on the node itself.
    Exit {
        identity: N::Identity,
        doomed: bool,
        absent: bool,
    },
}

/// Pending work for the insertion pass.
struct Insertion<N> {
    node: N,
    /// The parent is new, or sits inside a subtree that is.
    covered: bool,
}

/// How a child relates to its parent's reconciliation.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Keeps its place; only its subtree may change.
    Stable,
    /// Gets its own `Create`.
    Create,
    /// Attached, or carried along by a created ancestor.
    Other,
}

/// Order in which a parent's children are visited by the insertion pass.
///
/// Children keep their left-to-right order, except that from the first
/// created child onwards the stable children go first: changes nested in kept
/// structure surface before creations at this level. Children that are
/// inserted stay in ascending position.
fn insertion_order<N: Copy>(children: &[N], slot: impl Fn(&N) -> Slot) -> SmallVec<[N; 8]> {
    let slots: SmallVec<[Slot; 8]> = children.iter().map(&slot).collect();
    let Some(first_create) = slots.iter().position(|&s| s == Slot::Create) else {
        return children.iter().copied().collect();
    };

    let mut order: SmallVec<[N; 8]> = children[..first_create].iter().copied().collect();
    let rest = || children[first_create..].iter().zip(&slots[first_create..]);
    order.extend(rest().filter(|(_, s)| **s == Slot::Stable).map(|(c, _)| *c));
    order.extend(rest().filter(|(_, s)| **s != Slot::Stable).map(|(c, _)| *c));
    order
}

/// Whether a node present in both trees has to be detached and/or attached.
fn is_moved<I: Eq + Hash>(
    identity: &I,
    from_parent: Option<&I>,
    to_parent: Option<&I>,
    stable: &HashSet<I>,
) -> bool {
    match (from_parent, to_parent) {
        (None, None) => false,
        (Some(from_parent), Some(to_parent)) if from_parent == to_parent => {
            !stable.contains(identity)
        }
        _ => true,
    }
}

/// Find the children that keep their place under an unchanged parent.
///
/// Every node present in both trees is a parent pair to reconcile; the
/// to-tree walk is the worklist. A child is stable when it sits in the
/// longest common subsequence of the pair's old and new child lists.
fn align_siblings<F, T, I>(from_index: &IdentityIndex<F>, to: Option<T>) -> HashSet<I>
where
    F: TreeNode<Identity = I>,
    T: TreeNode<Identity = I>,
    I: Clone + Eq + Hash + fmt::Debug,
{
    let mut stable = HashSet::default();

    for to_node in traverse(to, Direction::LeftToRight, Order::Pre) {
        let identity = to_node.identity();
        let Some(from_entry) = from_index.get(&identity) else {
            continue;
        };

        let from_children: SmallVec<[I; 8]> =
            from_entry.node.children().map(|c| c.identity()).collect();
        let to_children: SmallVec<[I; 8]> = to_node.children().map(|c| c.identity()).collect();

        if from_children == to_children {
            stable.extend(to_children);
            continue;
        }

        let kept = longest_common_subsequence(&from_children, &to_children);
        trace!(
            parent = ?identity,
            from = from_children.len(),
            to = to_children.len(),
            kept = kept.len(),
            "aligned children"
        );
        stable.extend(kept);
    }

    stable
}
