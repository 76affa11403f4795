//! # treedelta
//!
//! Identity-keyed tree reconciliation.
//!
//! Given a current tree and a desired tree whose nodes carry stable
//! identities, treedelta computes the ordered edit script that turns one into
//! the other: `Delete`, `Create`, `Detach` and `Attach` operations a consumer
//! applies to converge the two. treedelta never mutates anything itself.
//!
//! ## Algorithm Overview
//!
//! 1. **Indexing**: each tree gets its own identity → node map; an identity
//!    seen twice in one tree aborts the call.
//! 2. **Sibling alignment**: for every node present in both trees, the longest
//!    common subsequence of its old and new child lists stays put. Other
//!    shared children move.
//! 3. **Edit script generation**: a right-to-left post-order pass over the old
//!    tree emits `Detach`/`Delete`, then a left-to-right pre-order pass over the
//!    new tree emits `Create`/`Attach`. Deleting or creating a subtree root
//!    covers every node of that subtree which is gone or new, however deep.
//!    Changes nested inside kept siblings come before removals and creations
//!    at the siblings' own level.
//!
//! ## Usage
//!
//! ```
//! use treedelta::{Operation, notation, reconcile};
//!
//! type Op = Operation<String>;
//!
//! let from = notation::parse("a(b(d,e),c(f,g))").unwrap();
//! let to = notation::parse("a(b(d,f),c(e,g))").unwrap();
//!
//! let ops = reconcile(Some(from.root()), Some(to.root())).unwrap();
//! assert_eq!(
//!     ops,
//!     [
//!         Op::detach("f"),
//!         Op::detach("e"),
//!         Op::attach("f", "b", 1),
//!         Op::attach("e", "c", 0),
//!     ]
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]

pub use indextree;

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

mod config;
mod delta;
mod error;
/// Identity → node lookup
pub mod index;
/// Longest common subsequence over sibling identities
pub mod matcher;
pub mod notation;
mod operation;
/// Directional tree walks
pub mod traversal;
/// The node contract and an arena-backed tree
pub mod tree;

use rayon::prelude::*;

pub use config::ReconcileConfig;
pub use delta::TreeDelta;
pub use error::{ReconcileError, Side};
pub use index::{Entry, IdentityIndex};
pub use matcher::longest_common_subsequence;
pub use operation::Operation;
pub use traversal::{Direction, Order, Traversal, Traverse, traverse};
pub use tree::{NodeRef, Tree, TreeNode};

/// Compute the edit script turning `from` into `to`.
///
/// This is the main entry point. `None` stands for an empty tree.
///
/// # Example
///
/// ```
/// use treedelta::{Operation, Tree, reconcile};
///
/// let mut from = Tree::new("a".to_string());
/// from.add_child(from.root, "b".to_string());
///
/// let mut to = Tree::new("a".to_string());
/// to.add_child(to.root, "c".to_string());
///
/// let ops = reconcile(Some(from.root()), Some(to.root())).unwrap();
/// assert_eq!(
///     ops,
///     [Operation::<String>::delete("b"), Operation::create("c", "a", 0)]
/// );
/// ```
pub fn reconcile<F, T>(
    from: Option<F>,
    to: Option<T>,
) -> Result<Vec<Operation<F::Identity>>, ReconcileError<F::Identity>>
where
    F: TreeNode,
    T: TreeNode<Identity = F::Identity>,
{
    reconcile_with_config(from, to, &ReconcileConfig::default())
}

/// Like [`reconcile`], honouring `config`.
pub fn reconcile_with_config<F, T>(
    from: Option<F>,
    to: Option<T>,
    config: &ReconcileConfig,
) -> Result<Vec<Operation<F::Identity>>, ReconcileError<F::Identity>>
where
    F: TreeNode,
    T: TreeNode<Identity = F::Identity>,
{
    TreeDelta::compute_with_config(from, to, config).map(TreeDelta::into_operations)
}

/// Reconcile many independent tree pairs in parallel.
///
/// Each pair is handled exactly as by [`reconcile_with_config`]; results come
/// back in input order, one per pair, so one failing pair does not affect the
/// others.
pub fn reconcile_all<F, T>(
    pairs: &[(Option<F>, Option<T>)],
    config: &ReconcileConfig,
) -> Vec<Result<Vec<Operation<F::Identity>>, ReconcileError<F::Identity>>>
where
    F: TreeNode + Send + Sync,
    T: TreeNode<Identity = F::Identity> + Send + Sync,
    F::Identity: Send,
{
    debug!(pairs = pairs.len(), "reconcile_all start");
    pairs
        .par_iter()
        .map(|&(from, to)| reconcile_with_config(from, to, config))
        .collect()
}
