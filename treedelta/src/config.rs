/// Configuration for a reconciliation.
#[derive(Debug, Clone, Default)]
pub struct ReconcileConfig {
    /// Maximum number of nodes accepted per input tree.
    ///
    /// `None` accepts trees of any size. With a limit, indexing stops and
    /// fails as soon as a tree yields one node too many.
    pub node_limit: Option<usize>,
}

impl ReconcileConfig {
    /// A configuration that rejects trees larger than `limit` nodes.
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            node_limit: Some(limit),
        }
    }
}
