use core::fmt;

/// Which of the two input trees an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The current tree.
    From,
    /// The desired tree.
    To,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::From => f.write_str("from"),
            Side::To => f.write_str("to"),
        }
    }
}

/// Errors that abort a reconciliation. No partial script is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError<I> {
    /// An identity occurs more than once within one tree.
    #[error("identity {identity:?} occurs more than once in the {side} tree")]
    DuplicateIdentity {
        /// The repeated identity.
        identity: I,
        /// The tree it repeats in.
        side: Side,
    },

    /// A tree has more nodes than [`crate::ReconcileConfig::node_limit`] allows.
    #[error("the {side} tree has more than {limit} nodes")]
    NodeLimitExceeded {
        /// The oversized tree.
        side: Side,
        /// The configured limit.
        limit: usize,
    },
}
