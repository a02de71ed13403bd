use super::NodeId;

/// Invalid operation on the output tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The node was removed (or never belonged to this document).
    #[error("node {0:?} is not part of the document")]
    Stale(NodeId),

    /// Appending would make a node its own ancestor.
    #[error("cannot move node {node:?} under its own descendant {parent:?}")]
    Cycle { node: NodeId, parent: NodeId },

    /// A reference node for `insert_before`/`insert_after` has no parent.
    #[error("node {0:?} has no parent")]
    Detached(NodeId),

    /// `sort_move` on an item whose container was not made sortable, or
    /// which carries no drag handle.
    #[error("node {0:?} is not a sortable item")]
    NotSortable(NodeId),

    #[error("position {position} is out of range for {len} items")]
    OutOfRange { position: usize, len: usize },
}
