use core::fmt;

/// One step of an edit script.
///
/// Positions are zero-based indices into the parent's final child list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation<I> {
    /// The node and its entire subtree cease to exist.
    Delete {
        /// The deleted node.
        identity: I,
    },

    /// A new node appears. Its new descendants come with it.
    Create {
        /// The new node.
        identity: I,
        /// Parent in the final tree, `None` when the new node is the new root.
        parent: Option<I>,
        /// Index among the parent's final children.
        position: usize,
    },

    /// An existing node leaves its parent, to reappear elsewhere.
    Detach {
        /// The detached node.
        identity: I,
    },

    /// An existing node is placed under a parent.
    Attach {
        /// The attached node.
        identity: I,
        /// Its parent in the final tree.
        parent: I,
        /// Index among the parent's final children.
        position: usize,
    },
}

impl<I> Operation<I> {
    /// `Delete { identity }`
    pub fn delete(identity: impl Into<I>) -> Self {
        Operation::Delete {
            identity: identity.into(),
        }
    }

    /// `Create` of a child node.
    pub fn create(identity: impl Into<I>, parent: impl Into<I>, position: usize) -> Self {
        Operation::Create {
            identity: identity.into(),
            parent: Some(parent.into()),
            position,
        }
    }

    /// `Create` of a new root.
    pub fn create_root(identity: impl Into<I>) -> Self {
        Operation::Create {
            identity: identity.into(),
            parent: None,
            position: 0,
        }
    }

    /// `Detach { identity }`
    pub fn detach(identity: impl Into<I>) -> Self {
        Operation::Detach {
            identity: identity.into(),
        }
    }

    /// `Attach` under `parent` at `position`.
    pub fn attach(identity: impl Into<I>, parent: impl Into<I>, position: usize) -> Self {
        Operation::Attach {
            identity: identity.into(),
            parent: parent.into(),
            position,
        }
    }

    /// The node this operation is about.
    pub fn identity(&self) -> &I {
        match self {
            Operation::Delete { identity }
            | Operation::Create { identity, .. }
            | Operation::Detach { identity }
            | Operation::Attach { identity, .. } => identity,
        }
    }

    /// Destination parent for `Create` and `Attach`.
    pub fn parent(&self) -> Option<&I> {
        match self {
            Operation::Create { parent, .. } => parent.as_ref(),
            Operation::Attach { parent, .. } => Some(parent),
            Operation::Delete { .. } | Operation::Detach { .. } => None,
        }
    }

    /// Destination index for `Create` and `Attach`.
    pub fn position(&self) -> Option<usize> {
        match self {
            Operation::Create { position, .. } | Operation::Attach { position, .. } => {
                Some(*position)
            }
            Operation::Delete { .. } | Operation::Detach { .. } => None,
        }
    }
}

impl<I: fmt::Display> fmt::Display for Operation<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Delete { identity } => write!(f, "Delete({identity})"),
            Operation::Create {
                identity,
                parent: Some(parent),
                position,
            } => write!(f, "Create({identity} under {parent} @{position})"),
            Operation::Create {
                identity,
                parent: None,
                ..
            } => write!(f, "Create({identity} as root)"),
            Operation::Detach { identity } => write!(f, "Detach({identity})"),
            Operation::Attach {
                identity,
                parent,
                position,
            } => write!(f, "Attach({identity} under {parent} @{position})"),
        }
    }
}
